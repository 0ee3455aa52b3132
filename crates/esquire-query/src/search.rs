//! Free-text search compiler.
//!
//! Turns a simplified query string into match clauses that are appended to
//! the current query:
//!
//! ```text
//! rust                 bare word      -> multi_match
//! "async runtime"      quoted phrase  -> multi_match (type: phrase)
//! title:tokio          field word     -> match
//! title:"hello world"  field phrase   -> match_phrase
//! -draft               negation       -> must_not instead of must
//! rust^2               token boost    -> boost: 2.0
//! http://x.y           anything else  -> multi_match on the literal run
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::clause::Bucket;

// A whitespace-separated run; quoted sections may contain whitespace.
static RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:[^\s"]|"[^"]*"?)+"#).expect("search run pattern is valid")
});

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<neg>-)?(?:(?P<field>[\w.@*]+):)?(?:"(?P<phrase>[^"]*)"?|(?P<word>[^\s"^:/][^\s"^:]*))(?:\^(?P<boost>\d+(?:\.\d+)?))?$"#,
    )
    .expect("search token pattern is valid")
});

/// Boolean operator between the analyzed terms of one match clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    And,
    Or,
}

impl MatchOperator {
    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOperator::And => "and",
            MatchOperator::Or => "or",
        }
    }
}

/// Per-search settings.
///
/// ```
/// use esquire_query::{MatchOperator, SearchSettings};
///
/// let settings = SearchSettings::default()
///     .fields(["title^3", "body"])
///     .operator(MatchOperator::And)
///     .boost(1.5);
/// assert_eq!(settings.get_fields(), ["title^3", "body"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSettings {
    fields: Vec<String>,
    boost: Option<f64>,
    operator: Option<MatchOperator>,
}

impl SearchSettings {
    /// Sets the fields bare tokens are matched against.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the boost attached to every generated clause.
    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Sets the operator attached to generated word clauses.
    pub fn operator(mut self, operator: MatchOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Returns the configured fields.
    pub fn get_fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the configured boost, if any.
    pub fn get_boost(&self) -> Option<f64> {
        self.boost
    }

    /// Returns the configured operator, if any.
    pub fn get_operator(&self) -> Option<MatchOperator> {
        self.operator
    }
}

#[derive(Debug, PartialEq)]
struct Token<'a> {
    negated: bool,
    field: Option<&'a str>,
    text: &'a str,
    phrase: bool,
    boost: Option<f64>,
}

impl<'a> Token<'a> {
    // A run that does not fit the token grammar is searched as one literal
    // word, keeping only a leading negation.
    fn parse(run: &'a str) -> Option<Token<'a>> {
        if let Some(caps) = TOKEN.captures(run) {
            return Token::from_captures(&caps);
        }
        let (negated, text) = match run.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, run),
        };
        if text.is_empty() || text.chars().all(|c| c == '-') {
            return None;
        }
        Some(Token {
            negated,
            field: None,
            text,
            phrase: false,
            boost: None,
        })
    }

    fn from_captures(caps: &Captures<'a>) -> Option<Token<'a>> {
        let (text, phrase) = match (caps.name("phrase"), caps.name("word")) {
            (Some(m), _) => (m.as_str().trim(), true),
            (None, Some(m)) => (m.as_str(), false),
            (None, None) => return None,
        };
        if text.is_empty() || text.chars().all(|c| c == '-') {
            return None;
        }
        Some(Token {
            negated: caps.name("neg").is_some(),
            field: caps.name("field").map(|m| m.as_str()),
            text,
            phrase,
            boost: caps.name("boost").and_then(|m| m.as_str().parse().ok()),
        })
    }
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    RUN.find_iter(input)
        .filter_map(|run| Token::parse(run.as_str()))
        .collect()
}

/// Compiles a query string into clauses and the buckets they belong in.
///
/// Blank input compiles to nothing.
///
/// ```
/// use esquire_query::{search, Bucket, SearchSettings};
/// use serde_json::json;
///
/// let clauses = search::compile("title:rust -draft", &SearchSettings::default());
/// assert_eq!(clauses[0], (Bucket::Must, json!({"match": {"title": {"query": "rust"}}})));
/// assert_eq!(clauses[1], (Bucket::MustNot, json!({"multi_match": {"query": "draft"}})));
/// ```
pub fn compile(input: &str, settings: &SearchSettings) -> Vec<(Bucket, Value)> {
    tokenize(input)
        .iter()
        .map(|token| {
            let bucket = if token.negated {
                Bucket::MustNot
            } else {
                Bucket::Must
            };
            (bucket, token_clause(token, settings))
        })
        .collect()
}

fn token_clause(token: &Token<'_>, settings: &SearchSettings) -> Value {
    let mut params = Map::new();
    params.insert("query".to_string(), json!(token.text));
    if let Some(boost) = token.boost.or(settings.boost) {
        params.insert("boost".to_string(), json!(boost));
    }
    if let (false, Some(operator)) = (token.phrase, settings.operator) {
        params.insert("operator".to_string(), json!(operator.as_str()));
    }

    match token.field {
        Some(field) => {
            let kind = if token.phrase { "match_phrase" } else { "match" };
            json!({ kind: { field: params } })
        }
        None => {
            if !settings.fields.is_empty() {
                params.insert("fields".to_string(), json!(settings.fields));
            }
            if token.phrase {
                params.insert("type".to_string(), json!("phrase"));
            }
            json!({ "multi_match": params })
        }
    }
}
