//! Hit hydration.
//!
//! Raw hits are handed to a [`Model`] one at a time, in response order.
//! [`Document<T>`] covers any serde-deserializable source; implement
//! [`Model`] directly when a model needs more than its `_source`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One raw hit as returned by the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(default)]
    pub highlight: Option<Value>,
    #[serde(default)]
    pub sort: Option<Vec<Value>>,
}

/// A type that can be built from a raw hit.
pub trait Model: Sized {
    /// Converts one hit.
    fn from_hit(hit: Hit) -> Result<Self>;
}

impl Model for Hit {
    fn from_hit(hit: Hit) -> Result<Self> {
        Ok(hit)
    }
}

/// A hit with its `_source` deserialized into `T`.
///
/// ```
/// use esquire::{Document, Hit, Model};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Post {
///     title: String,
/// }
///
/// let hit: Hit = serde_json::from_value(json!({
///     "_index": "posts",
///     "_id": "1",
///     "_score": 1.5,
///     "_source": {"title": "Hello"}
/// })).unwrap();
///
/// let doc = Document::<Post>::from_hit(hit).unwrap();
/// assert_eq!(doc.id, "1");
/// assert_eq!(doc.source, Post { title: "Hello".into() });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T = Value> {
    pub id: String,
    pub index: Option<String>,
    pub score: Option<f64>,
    pub highlight: Option<Value>,
    pub source: T,
}

impl<T: DeserializeOwned> Model for Document<T> {
    fn from_hit(hit: Hit) -> Result<Self> {
        let Hit {
            index,
            id,
            score,
            source,
            highlight,
            ..
        } = hit;
        let source = serde_json::from_value(source).map_err(|source| Error::Hydrate {
            id: id.clone(),
            source,
        })?;
        Ok(Document {
            id,
            index,
            score,
            highlight,
            source,
        })
    }
}
