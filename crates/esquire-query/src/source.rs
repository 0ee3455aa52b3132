//! Source projection.
//!
//! A [`Source`] holds the fields to include in and exclude from returned
//! documents. A field is never in both lists at once.

/// Include/exclude field lists for `_source` filtering.
///
/// `select` always wins for the fields it names. `unselect` on a field that
/// is currently selected only deselects it, so the field ends up in neither
/// list; `unselect` on any other field excludes it.
///
/// # Example
///
/// ```
/// use esquire_query::Source;
///
/// let mut source = Source::default();
/// source.select(["a", "b"]);
/// source.unselect(["a", "c"]);
///
/// assert_eq!(source.include(), ["b"]);
/// assert_eq!(source.exclude(), ["c"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Source {
    /// Adds fields to the include list, removing them from the exclude list.
    pub fn select<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            self.exclude.retain(|f| *f != field);
            if !self.include.contains(&field) {
                self.include.push(field);
            }
        }
    }

    /// Deselects included fields and excludes the rest.
    pub fn unselect<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if self.include.contains(&field) {
                self.include.retain(|f| *f != field);
            } else if !self.exclude.contains(&field) {
                self.exclude.push(field);
            }
        }
    }

    /// Returns the included fields.
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Returns the excluded fields.
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Returns `true` if neither list holds a field.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}
