//! Bind collectors: ordering parameterized query placeholders.
//!
//! SQL assembly interleaves placeholder text with literal SQL while the
//! parameter values accumulate on the side. A [`BindCollector`] owns both
//! halves of that bookkeeping so placeholder numbering and value order
//! cannot drift apart.

use crate::value::{SqlValue, ToSqlValue};

/// The placeholder family a backend binds with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// Unnamed positional markers: `?`, in bind order.
    Positional,
    /// Numbered markers: `$1`, `$2`, ..., 1-based.
    Numbered,
}

/// Collects query parameters and hands out their placeholder text.
///
/// A collector is single-use: build one per statement, push values while
/// assembling the SQL string, then take the ordered values for binding.
///
/// # Example
///
/// ```rust
/// use rivet_sql_core::bind::{BindCollector, BindStyle};
///
/// let mut collector = BindCollector::new(BindStyle::Positional);
/// let sql = format!("SELECT id FROM users WHERE name = {}", collector.push("alice"));
/// assert_eq!(sql, "SELECT id FROM users WHERE name = ?");
/// ```
#[derive(Debug)]
pub struct BindCollector {
    style: BindStyle,
    values: Vec<SqlValue>,
}

impl BindCollector {
    /// Creates an empty collector for the given placeholder style.
    #[must_use]
    pub const fn new(style: BindStyle) -> Self {
        Self {
            style,
            values: Vec::new(),
        }
    }

    /// Returns the collector's placeholder style.
    #[must_use]
    pub const fn style(&self) -> BindStyle {
        self.style
    }

    /// Records a value and returns the placeholder to splice into the SQL.
    pub fn push<V: ToSqlValue>(&mut self, value: V) -> String {
        self.values.push(value.to_sql_value());
        match self.style {
            BindStyle::Positional => String::from("?"),
            BindStyle::Numbered => format!("${}", self.values.len()),
        }
    }

    /// Returns the number of collected values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no values have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the collector, yielding values in push order.
    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_placeholders_repeat() {
        let mut collector = BindCollector::new(BindStyle::Positional);
        assert_eq!(collector.push(1_i64), "?");
        assert_eq!(collector.push("two"), "?");
        assert_eq!(collector.push(3.0_f64), "?");
        assert_eq!(
            collector.into_values(),
            vec![
                SqlValue::Int(1),
                SqlValue::Text(String::from("two")),
                SqlValue::Float(3.0),
            ]
        );
    }

    #[test]
    fn numbered_placeholders_are_sequential() {
        let mut collector = BindCollector::new(BindStyle::Numbered);
        assert_eq!(collector.push("a"), "$1");
        assert_eq!(collector.push("b"), "$2");
        assert_eq!(collector.push("c"), "$3");
        assert_eq!(collector.len(), 3);
    }

    #[test]
    fn empty_collector() {
        let collector = BindCollector::new(BindStyle::Positional);
        assert!(collector.is_empty());
        assert!(collector.into_values().is_empty());
    }
}
