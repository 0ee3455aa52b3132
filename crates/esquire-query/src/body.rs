//! Body assembler.
//!
//! Reduces a [`Query`] into the request body the search engine expects.
//! Assembly only reads the query, so assembling twice without mutation
//! produces the same document.

use serde_json::{json, Map, Value};
use tracing::{trace, warn};

use crate::clause::Bucket;
use crate::ordering::OrderBy;
use crate::query::Query;
use crate::request::SearchRequest;
use crate::source::Source;

impl Query {
    /// Assembles the request body.
    ///
    /// The raw body override is the base document. The source projection is
    /// merged into `_source`, clauses go under `query.bool`, and sort entries
    /// are appended to any raw `sort` with exact duplicates removed. A query
    /// with no clauses and no raw `query` has no `query` key at all.
    pub fn to_body(&self) -> Value {
        let mut body = self.body.clone();

        merge_source(&mut body, &self.source);
        merge_bool(&mut body, self);
        merge_sort(&mut body, &self.sort);

        trace!(
            must = self.must.len(),
            must_not = self.must_not.len(),
            filter = self.filter.len(),
            sort = self.sort.len(),
            "assembled query body"
        );
        Value::Object(body)
    }

    /// Assembles the full search call: body plus request parameters.
    ///
    /// Pagination travels as `from` / `size`, never inside the body.
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            index: self.index.clone(),
            doc_type: self.doc_type.clone(),
            id: self.id.clone(),
            body: self.to_body(),
            from: self.from,
            size: self.size,
            search_type: self.search_type,
            scroll: self.scroll.clone(),
            scroll_id: self.scroll_id.clone(),
            ignore: self.ignore.clone(),
        }
    }
}

// Builder lists overwrite the matching keys of the raw `_source`, and
// fields the builder names are dropped from the opposite raw list. A raw
// array or string is shorthand for `includes`; any other raw value is
// replaced.
fn merge_source(body: &mut Map<String, Value>, source: &Source) {
    if source.is_empty() {
        return;
    }
    let mut projection = match body.remove("_source") {
        Some(Value::Object(map)) => map,
        Some(fields @ (Value::Array(_) | Value::String(_))) => {
            let mut map = Map::new();
            map.insert("includes".to_string(), fields);
            map
        }
        _ => Map::new(),
    };
    if !source.include().is_empty() {
        projection.insert("includes".to_string(), json!(source.include()));
    }
    if !source.exclude().is_empty() {
        projection.insert("excludes".to_string(), json!(source.exclude()));
    }
    drop_fields(&mut projection, "excludes", source.include());
    drop_fields(&mut projection, "includes", source.exclude());
    body.insert("_source".to_string(), Value::Object(projection));
}

fn drop_fields(projection: &mut Map<String, Value>, key: &str, fields: &[String]) {
    if fields.is_empty() {
        return;
    }
    let named = |value: &Value| {
        value
            .as_str()
            .is_some_and(|name| fields.iter().any(|f| f == name))
    };
    let list = match projection.remove(key) {
        Some(Value::Array(list)) => list,
        Some(single @ Value::String(_)) => vec![single],
        Some(other) => {
            projection.insert(key.to_string(), other);
            return;
        }
        None => return,
    };
    let kept: Vec<Value> = list.into_iter().filter(|v| !named(v)).collect();
    if !kept.is_empty() {
        projection.insert(key.to_string(), Value::Array(kept));
    }
}

fn merge_bool(body: &mut Map<String, Value>, query: &Query) {
    let mut root = match body.remove("query") {
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!(raw = %other, "raw query is not an object, replacing");
            Map::new()
        }
        None => Map::new(),
    };

    if !query.is_empty() {
        let mut bool_query = match root.remove("bool") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for bucket in [Bucket::Must, Bucket::MustNot, Bucket::Filter] {
            let clauses = query.clauses(bucket);
            if !clauses.is_empty() {
                bool_query.insert(bucket.key().to_string(), Value::Array(clauses.to_vec()));
            }
        }
        root.insert("bool".to_string(), Value::Object(bool_query));
    }

    if !root.is_empty() {
        body.insert("query".to_string(), Value::Object(root));
    }
}

fn merge_sort(body: &mut Map<String, Value>, sort: &[OrderBy]) {
    if sort.is_empty() {
        return;
    }
    let raw = match body.remove("sort") {
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
        None => Vec::new(),
    };

    let mut merged: Vec<Value> = Vec::with_capacity(raw.len() + sort.len());
    for entry in raw.into_iter().chain(sort.iter().map(OrderBy::to_value)) {
        if !merged.contains(&entry) {
            merged.push(entry);
        }
    }
    body.insert("sort".to_string(), Value::Array(merged));
}
