//! Query builder.
//!
//! The [`Query`] struct accumulates clauses and request parameters through
//! a fluent API. Assembly into a request body lives in the `body` module.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{trace, warn};

use crate::clause::{self, Bounds, Bucket, Condition};
use crate::config::QueryConfig;
use crate::op::Op;
use crate::ordering::{Dir, OrderBy};
use crate::request::SearchType;
use crate::search::{self, SearchSettings};
use crate::source::Source;

/// A sub-query applied to the builder in place of a single clause.
pub struct Group<'a>(Box<dyn FnOnce(Query) -> Query + 'a>);

impl<'a> Group<'a> {
    /// Wraps a closure that receives the builder and hands it back.
    pub fn new(f: impl FnOnce(Query) -> Query + 'a) -> Self {
        Group(Box::new(f))
    }

    fn apply(self, query: Query) -> Query {
        (self.0)(query)
    }
}

impl fmt::Debug for Group<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Group(..)")
    }
}

/// First argument of every where-family method.
///
/// Either a field name, or a [`Group`] that is applied to the builder
/// instead of adding a clause.
///
/// ```
/// use esquire_query::{Field, Query};
///
/// let query = Query::new().where_eq(
///     Field::group(|q| q.where_eq("status", "active").where_op("age", ">", 18)),
///     (),
/// );
/// assert_eq!(query.filter_clauses().len(), 2);
/// ```
#[derive(Debug)]
pub enum Field<'a> {
    /// A field name.
    Name(String),
    /// A grouped sub-query.
    Group(Group<'a>),
}

impl<'a> Field<'a> {
    /// Creates a group argument from a closure.
    pub fn group(f: impl FnOnce(Query) -> Query + 'a) -> Self {
        Field::Group(Group::new(f))
    }
}

impl From<&str> for Field<'_> {
    fn from(name: &str) -> Self {
        Field::Name(name.to_string())
    }
}

impl From<String> for Field<'_> {
    fn from(name: String) -> Self {
        Field::Name(name)
    }
}

impl From<&String> for Field<'_> {
    fn from(name: &String) -> Self {
        Field::Name(name.clone())
    }
}

impl<'a> From<Group<'a>> for Field<'a> {
    fn from(group: Group<'a>) -> Self {
        Field::Group(group)
    }
}

/// A search query under construction.
///
/// Clauses land in one of three lists:
/// - **must**: must match and contributes to the score
/// - **must_not**: must not match
/// - **filter**: must match, no score contribution
///
/// Every builder method consumes the query and returns it, so calls chain.
/// Nothing here performs I/O or fails.
///
/// # Example
///
/// ```
/// use esquire_query::{Dir, Query};
/// use serde_json::json;
///
/// let query = Query::new()
///     .index("users")
///     .where_op("age", ">", 18)
///     .where_eq("status", "active")
///     .order_by("name", Dir::Asc)
///     .take(5)
///     .skip(10);
///
/// assert_eq!(
///     query.to_body(),
///     json!({
///         "query": {"bool": {"filter": [
///             {"range": {"age": {"gt": 18}}},
///             {"term": {"status": "active"}}
///         ]}},
///         "sort": [{"name": "asc"}]
///     })
/// );
/// assert_eq!(query.get_limit(), 5);
/// assert_eq!(query.get_offset(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) config: Arc<QueryConfig>,
    pub(crate) index: Option<String>,
    pub(crate) doc_type: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) must: Vec<Value>,
    pub(crate) must_not: Vec<Value>,
    pub(crate) filter: Vec<Value>,
    pub(crate) sort: Vec<OrderBy>,
    pub(crate) source: Source,
    pub(crate) size: usize,
    pub(crate) from: usize,
    pub(crate) scroll: Option<String>,
    pub(crate) scroll_id: Option<String>,
    pub(crate) search_type: Option<SearchType>,
    pub(crate) ignore: Vec<u16>,
    pub(crate) body: Map<String, Value>,
}

impl Default for Query {
    fn default() -> Self {
        Query::new()
    }
}

impl Query {
    /// Creates an empty query using the shared default configuration.
    ///
    /// An empty query matches every document.
    pub fn new() -> Self {
        Query::with_config(QueryConfig::shared())
    }

    /// Creates an empty query using the given configuration.
    pub fn with_config(config: Arc<QueryConfig>) -> Self {
        Query {
            size: config.default_limit,
            from: config.default_offset,
            config,
            index: None,
            doc_type: None,
            id: None,
            must: Vec::new(),
            must_not: Vec::new(),
            filter: Vec::new(),
            sort: Vec::new(),
            source: Source::default(),
            scroll: None,
            scroll_id: None,
            search_type: None,
            ignore: Vec::new(),
            body: Map::new(),
        }
    }

    // ========================================================================
    // Target
    // ========================================================================

    /// Sets the index to search.
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self
    }

    /// Sets the document type.
    pub fn doc_type(mut self, name: impl Into<String>) -> Self {
        self.doc_type = Some(name.into());
        self
    }

    /// Narrows the query to a single document id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    // ========================================================================
    // Where
    // ========================================================================

    /// Adds an equality clause: the two-argument `where(field, value)` form.
    ///
    /// Equality on the configured id field sets [`Query::id`] instead.
    pub fn where_eq<'f>(self, field: impl Into<Field<'f>>, value: impl Into<Value>) -> Self {
        self.with_field(field, |q, name| q.where_condition(Condition::eq(name, value)))
    }

    /// Adds a clause from an operator token.
    ///
    /// An unrecognised token is taken as the value of an equality clause
    /// and `value` is dropped.
    pub fn where_op<'f>(self, field: impl Into<Field<'f>>, token: &str, value: impl Into<Value>) -> Self {
        self.with_field(field, |q, name| {
            q.where_condition(Condition::from_token(name, token, value))
        })
    }

    /// Adds a clause with a typed operator.
    pub fn where_cmp<'f>(self, field: impl Into<Field<'f>>, op: Op, value: impl Into<Value>) -> Self {
        self.with_field(field, |q, name| q.where_condition(Condition::new(name, op, value)))
    }

    /// Adds a compiled condition.
    pub fn where_condition(mut self, condition: Condition) -> Self {
        if condition.op == Op::Eq && condition.field == self.config.id_field {
            trace!(field = %condition.field, "equality on id field narrows to one document");
            self.id = Some(id_string(condition.value));
            return self;
        }
        let (bucket, clause) = condition.compile();
        trace!(field = %condition.field, op = %condition.op, %bucket, "routed clause");
        self.push(bucket, clause);
        self
    }

    /// Applies a grouped sub-query.
    pub fn where_group<F>(self, f: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        f(self)
    }

    /// Adds a negated equality clause.
    pub fn where_not_eq<'f>(self, field: impl Into<Field<'f>>, value: impl Into<Value>) -> Self {
        self.with_field(field, |q, name| q.where_not_condition(Condition::eq(name, value)))
    }

    /// Adds a negated clause from an operator token.
    pub fn where_not_op<'f>(self, field: impl Into<Field<'f>>, token: &str, value: impl Into<Value>) -> Self {
        self.with_field(field, |q, name| {
            q.where_not_condition(Condition::from_token(name, token, value))
        })
    }

    /// Adds a negated clause with a typed operator.
    pub fn where_not_cmp<'f>(self, field: impl Into<Field<'f>>, op: Op, value: impl Into<Value>) -> Self {
        self.with_field(field, |q, name| q.where_not_condition(Condition::new(name, op, value)))
    }

    /// Adds a negated compiled condition.
    ///
    /// `exists` has its boolean inverted and routes like a positive where.
    pub fn where_not_condition(mut self, condition: Condition) -> Self {
        let (bucket, clause) = condition.compile_negated();
        trace!(field = %condition.field, op = %condition.op, %bucket, "routed negated clause");
        self.push(bucket, clause);
        self
    }

    /// Adds an inclusive range clause to `filter`.
    ///
    /// ```
    /// use esquire_query::Query;
    ///
    /// let tuple = Query::new().where_between("age", (18, 30));
    /// let vector = Query::new().where_between("age", vec![18, 30]);
    /// assert_eq!(tuple.to_body(), vector.to_body());
    /// ```
    pub fn where_between<'f>(self, field: impl Into<Field<'f>>, bounds: impl Into<Bounds>) -> Self {
        self.with_field(field, |mut q, name| {
            let Bounds { lower, upper } = bounds.into();
            q.filter.push(clause::between(&name, lower, upper));
            q
        })
    }

    /// Adds an inclusive range clause to `must_not`.
    pub fn where_not_between<'f>(self, field: impl Into<Field<'f>>, bounds: impl Into<Bounds>) -> Self {
        self.with_field(field, |mut q, name| {
            let Bounds { lower, upper } = bounds.into();
            q.must_not.push(clause::between(&name, lower, upper));
            q
        })
    }

    /// Adds a `terms` clause to `filter`.
    pub fn where_in<'f, I, V>(self, field: impl Into<Field<'f>>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with_field(field, |mut q, name| {
            let values = values.into_iter().map(Into::into).collect();
            q.filter.push(clause::terms(&name, values));
            q
        })
    }

    /// Adds a `terms` clause to `must_not`.
    pub fn where_not_in<'f, I, V>(self, field: impl Into<Field<'f>>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with_field(field, |mut q, name| {
            let values = values.into_iter().map(Into::into).collect();
            q.must_not.push(clause::terms(&name, values));
            q
        })
    }

    /// Adds a `geo_distance` clause to `filter`.
    ///
    /// The point is passed through unvalidated.
    pub fn distance(mut self, field: &str, point: impl Into<Value>, radius: &str) -> Self {
        self.filter
            .push(clause::geo_distance(field, point.into(), radius));
        self
    }

    // ========================================================================
    // Free-text search
    // ========================================================================

    /// Adds clauses parsed from a query string. Blank input is a no-op.
    pub fn search(self, text: &str) -> Self {
        self.search_with(text, |settings| settings)
    }

    /// Adds clauses parsed from a query string with a boost on each.
    pub fn search_boosted(self, text: &str, boost: f64) -> Self {
        self.search_with(text, |settings| settings.boost(boost))
    }

    /// Adds clauses parsed from a query string with custom settings.
    ///
    /// ```
    /// use esquire_query::Query;
    /// use serde_json::json;
    ///
    /// let query = Query::new().search_with("rust -java", |s| s.fields(["title", "body"]));
    /// assert_eq!(
    ///     query.must_clauses(),
    ///     [json!({"multi_match": {"query": "rust", "fields": ["title", "body"]}})]
    /// );
    /// assert_eq!(query.must_not_clauses().len(), 1);
    /// ```
    pub fn search_with<F>(mut self, text: &str, settings: F) -> Self
    where
        F: FnOnce(SearchSettings) -> SearchSettings,
    {
        if text.trim().is_empty() {
            return self;
        }
        let settings = settings(SearchSettings::default());
        for (bucket, clause) in search::compile(text, &settings) {
            self.push(bucket, clause);
        }
        self
    }

    // ========================================================================
    // Source projection
    // ========================================================================

    /// Adds fields to the returned `_source`.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source.select(fields);
        self
    }

    /// Removes fields from the returned `_source`.
    pub fn unselect<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source.unselect(fields);
        self
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Appends a sort entry.
    ///
    /// The direction is a [`Dir`] or a token such as `"desc"`; tokens
    /// other than `desc` sort ascending. Exact duplicates are collapsed when
    /// the body is assembled.
    pub fn order_by(mut self, field: &str, dir: impl Into<Dir>) -> Self {
        self.sort.push(OrderBy::new(field, dir.into()));
        self
    }

    /// Appends an ascending sort entry.
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Appends a descending sort entry.
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    // ========================================================================
    // Window and request parameters
    // ========================================================================

    /// Sets the page size.
    pub fn take(mut self, n: usize) -> Self {
        self.size = n;
        self
    }

    /// Sets the page offset.
    pub fn skip(mut self, n: usize) -> Self {
        self.from = n;
        self
    }

    /// Opens a scroll session with the given keep-alive, e.g. `"1m"`.
    pub fn scroll(mut self, keep_alive: impl Into<String>) -> Self {
        self.scroll = Some(keep_alive.into());
        self
    }

    /// Opens a scroll session with the configured default keep-alive.
    pub fn scroll_default(self) -> Self {
        let keep_alive = self.config.default_scroll.clone();
        self.scroll(keep_alive)
    }

    /// Sets the scroll id to continue from.
    pub fn scroll_id(mut self, id: impl Into<String>) -> Self {
        self.scroll_id = Some(id.into());
        self
    }

    /// Sets the search type.
    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = Some(search_type);
        self
    }

    /// Treats the given status codes as an empty result.
    pub fn ignore<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        for code in codes {
            if !self.ignore.contains(&code) {
                self.ignore.push(code);
            }
        }
        self
    }

    // ========================================================================
    // Raw body
    // ========================================================================

    /// Replaces the raw body override.
    ///
    /// Structured clauses are still merged into it on assembly. A value that
    /// is not a JSON object clears the override.
    pub fn body(mut self, doc: Value) -> Self {
        self.body = match doc {
            Value::Object(map) => map,
            other => {
                warn!(kind = json_kind(&other), "raw body is not an object, discarding");
                Map::new()
            }
        };
        self
    }

    /// Replaces the whole raw body with a `nested` query on `path`.
    ///
    /// Anything previously set with [`Query::body`], [`Query::group_by`] or
    /// [`Query::highlight`] is discarded.
    pub fn nested(mut self, path: &str) -> Self {
        let mut body = Map::new();
        body.insert("query".to_string(), json!({ "nested": { "path": path } }));
        self.body = body;
        self
    }

    /// Collapses results on a field.
    pub fn group_by(mut self, field: &str) -> Self {
        self.body
            .insert("collapse".to_string(), json!({ "field": field }));
        self
    }

    /// Requests highlighting for the given fields.
    pub fn highlight<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Map<String, Value> = fields
            .into_iter()
            .map(|field| (field.into(), json!({})))
            .collect();
        self.body
            .insert("highlight".to_string(), json!({ "fields": fields }));
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the configuration this query was created with.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Returns the target index, if set.
    pub fn get_index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Returns the document type, if set.
    pub fn get_doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    /// Returns the single-document id, if set.
    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the `must` clauses.
    pub fn must_clauses(&self) -> &[Value] {
        &self.must
    }

    /// Returns the `must_not` clauses.
    pub fn must_not_clauses(&self) -> &[Value] {
        &self.must_not
    }

    /// Returns the `filter` clauses.
    pub fn filter_clauses(&self) -> &[Value] {
        &self.filter
    }

    /// Returns the clauses of one bucket.
    pub fn clauses(&self, bucket: Bucket) -> &[Value] {
        match bucket {
            Bucket::Must => &self.must,
            Bucket::MustNot => &self.must_not,
            Bucket::Filter => &self.filter,
        }
    }

    /// Returns the sort entries in call order.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.sort
    }

    /// Returns the source projection.
    pub fn get_source(&self) -> &Source {
        &self.source
    }

    /// Returns the page size.
    pub fn get_limit(&self) -> usize {
        self.size
    }

    /// Returns the page offset.
    pub fn get_offset(&self) -> usize {
        self.from
    }

    /// Returns the scroll keep-alive, if a scroll session was requested.
    pub fn get_scroll(&self) -> Option<&str> {
        self.scroll.as_deref()
    }

    /// Returns the scroll id, if set.
    pub fn get_scroll_id(&self) -> Option<&str> {
        self.scroll_id.as_deref()
    }

    /// Returns the search type, if set.
    pub fn get_search_type(&self) -> Option<SearchType> {
        self.search_type
    }

    /// Returns the ignored status codes in the order they were added.
    pub fn ignored(&self) -> &[u16] {
        &self.ignore
    }

    /// Returns the raw body override.
    pub fn raw_body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Returns `true` if no clause has been added.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.filter.is_empty()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn with_field<'f, F>(self, field: impl Into<Field<'f>>, then: F) -> Self
    where
        F: FnOnce(Query, String) -> Query,
    {
        match field.into() {
            Field::Name(name) => then(self, name),
            Field::Group(group) => group.apply(self),
        }
    }

    fn push(&mut self, bucket: Bucket, clause: Value) {
        match bucket {
            Bucket::Must => self.must.push(clause),
            Bucket::MustNot => self.must_not.push(clause),
            Bucket::Filter => self.filter.push(clause),
        }
    }
}

fn id_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
