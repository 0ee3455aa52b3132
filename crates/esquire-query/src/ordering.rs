//! Sort directives.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for a field-based
//! sort entry as it appears in the request body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Parses a direction token, case-insensitively.
    ///
    /// Anything other than `desc` is ascending.
    pub fn parse(token: &str) -> Dir {
        if token.eq_ignore_ascii_case("desc") {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl From<&str> for Dir {
    fn from(token: &str) -> Self {
        Dir::parse(token)
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single sort entry: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending sort entry for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending sort entry for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new sort entry with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Returns the body form of this entry: `{field: "asc"}`.
    pub fn to_value(&self) -> Value {
        let field = self.field.as_str();
        json!({ field: self.dir.as_str() })
    }
}
