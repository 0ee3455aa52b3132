//! Comparison operators for where clauses.
//!
//! The [`Op`] enum is the fixed set of operator tokens the builder
//! recognises. Anything else passed as an operator token is treated as a
//! value (see [`Condition::from_token`](crate::Condition::from_token)).

/// Comparison operator for a where clause.
///
/// Each operator maps to one clause shape:
/// - **Equality**: `Eq` -> `term`
/// - **Range**: `Gt`, `Gte`, `Lt`, `Lte` -> `range`
/// - **Full text**: `Like` -> `match`
/// - **Presence**: `Exists` -> `exists`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Exact match (`=`).
    Eq,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Gte,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Lte,
    /// Analyzed full-text match (`like`).
    Like,
    /// Field presence (`exists`). The clause value is read as a boolean.
    Exists,
}

impl Op {
    /// Every recognised operator, in token order.
    pub const ALL: [Op; 7] = [
        Op::Eq,
        Op::Gt,
        Op::Gte,
        Op::Lt,
        Op::Lte,
        Op::Like,
        Op::Exists,
    ];

    /// Parses an operator token.
    ///
    /// Returns `None` for anything that is not exactly one of `=`, `>`,
    /// `>=`, `<`, `<=`, `like` or `exists`.
    pub fn parse(token: &str) -> Option<Op> {
        match token {
            "=" => Some(Op::Eq),
            ">" => Some(Op::Gt),
            ">=" => Some(Op::Gte),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Lte),
            "like" => Some(Op::Like),
            "exists" => Some(Op::Exists),
            _ => None,
        }
    }

    /// Returns the bound key used inside a `range` clause.
    ///
    /// `None` for operators that do not compile to a range.
    pub fn range_key(self) -> Option<&'static str> {
        match self {
            Op::Gt => Some("gt"),
            Op::Gte => Some("gte"),
            Op::Lt => Some("lt"),
            Op::Lte => Some("lte"),
            _ => None,
        }
    }

    /// Returns the token form of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "like",
            Op::Exists => "exists",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
