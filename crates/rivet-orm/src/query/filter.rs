//! Composable WHERE-clause expressions.
//!
//! A [`Where`] wraps a predicate tree that can be combined with AND, OR,
//! and NOT before the query renders it. Rendering happens against a
//! [`BindCollector`] so placeholder text and parameter order stay in sync.

use std::fmt;

use rivet_sql_core::bind::BindCollector;
use rivet_sql_core::value::{SqlValue, ToSqlValue};

/// A filter expression that can be combined with other expressions.
///
/// # Example
///
/// ```ignore
/// use rivet_orm::Where;
///
/// // Simple equality
/// let cond = Where::eq("status", "active");
///
/// // Boolean combinations
/// let cond = Where::eq("status", "active")
///     .and(Where::gt("age", 18).or(Where::eq("verified", true)));
/// ```
#[derive(Debug, Clone)]
pub struct Where {
    predicate: Predicate,
}

/// Internal predicate tree.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `field <op> value`.
    Compare {
        /// Column name.
        field: String,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand value.
        value: SqlValue,
    },
    /// `field IS NULL`.
    IsNull {
        /// Column name.
        field: String,
    },
    /// `field IS NOT NULL`.
    IsNotNull {
        /// Column name.
        field: String,
    },
    /// `field IN (...)`.
    InList {
        /// Column name.
        field: String,
        /// Values in the list.
        values: Vec<SqlValue>,
    },
    /// `field NOT IN (...)`.
    NotInList {
        /// Column name.
        field: String,
        /// Values in the list.
        values: Vec<SqlValue>,
    },
    /// `field LIKE pattern`.
    Like {
        /// Column name.
        field: String,
        /// LIKE pattern.
        pattern: String,
    },
    /// `field BETWEEN low AND high`.
    Between {
        /// Column name.
        field: String,
        /// Lower bound.
        low: SqlValue,
        /// Upper bound.
        high: SqlValue,
    },
    /// Conjunction.
    And(Box<Predicate>, Box<Predicate>),
    /// Disjunction.
    Or(Box<Predicate>, Box<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
    /// Raw SQL with pre-ordered parameters.
    Raw {
        /// SQL fragment with `?` markers.
        sql: String,
        /// Parameters for the markers, in order.
        params: Vec<SqlValue>,
    },
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "!="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
        }
    }
}

impl Where {
    fn compare<V: ToSqlValue>(field: &str, op: CompareOp, value: V) -> Self {
        Self {
            predicate: Predicate::Compare {
                field: field.to_string(),
                op,
                value: value.to_sql_value(),
            },
        }
    }

    /// Creates an equality filter (field = value).
    pub fn eq<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    /// Creates an inequality filter (field != value).
    pub fn ne<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    /// Creates a greater-than filter (field > value).
    pub fn gt<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    /// Creates a greater-than-or-equal filter (field >= value).
    pub fn gte<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    /// Creates a less-than filter (field < value).
    pub fn lt<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    /// Creates a less-than-or-equal filter (field <= value).
    pub fn lte<V: ToSqlValue>(field: &str, value: V) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    /// Creates an IS NULL filter.
    #[must_use]
    pub fn is_null(field: &str) -> Self {
        Self {
            predicate: Predicate::IsNull {
                field: field.to_string(),
            },
        }
    }

    /// Creates an IS NOT NULL filter.
    #[must_use]
    pub fn is_not_null(field: &str) -> Self {
        Self {
            predicate: Predicate::IsNotNull {
                field: field.to_string(),
            },
        }
    }

    /// Creates an IN list filter.
    pub fn in_list<V: ToSqlValue>(field: &str, values: Vec<V>) -> Self {
        Self {
            predicate: Predicate::InList {
                field: field.to_string(),
                values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            },
        }
    }

    /// Creates a NOT IN list filter.
    pub fn not_in_list<V: ToSqlValue>(field: &str, values: Vec<V>) -> Self {
        Self {
            predicate: Predicate::NotInList {
                field: field.to_string(),
                values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            },
        }
    }

    /// Creates a LIKE filter. Use `%` for wildcard matching.
    #[must_use]
    pub fn like(field: &str, pattern: &str) -> Self {
        Self {
            predicate: Predicate::Like {
                field: field.to_string(),
                pattern: pattern.to_string(),
            },
        }
    }

    /// Creates a BETWEEN filter (low <= field <= high).
    pub fn between<V: ToSqlValue>(field: &str, low: V, high: V) -> Self {
        Self {
            predicate: Predicate::Between {
                field: field.to_string(),
                low: low.to_sql_value(),
                high: high.to_sql_value(),
            },
        }
    }

    /// Creates a raw SQL filter with `?` markers and matching parameters.
    ///
    /// **Warning**: keep values in `params`, never spliced into `sql`.
    #[must_use]
    pub fn raw(sql: &str, params: Vec<SqlValue>) -> Self {
        Self {
            predicate: Predicate::Raw {
                sql: sql.to_string(),
                params,
            },
        }
    }

    /// Combines this filter with another using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self {
            predicate: Predicate::And(Box::new(self.predicate), Box::new(other.predicate)),
        }
    }

    /// Combines this filter with another using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            predicate: Predicate::Or(Box::new(self.predicate), Box::new(other.predicate)),
        }
    }

    /// Negates this filter with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            predicate: Predicate::Not(Box::new(self.predicate)),
        }
    }

    /// Returns the internal predicate tree.
    #[must_use]
    pub fn into_predicate(self) -> Predicate {
        self.predicate
    }

    /// Renders the predicate, pushing parameters onto the collector.
    pub fn render(&self, collector: &mut BindCollector) -> String {
        self.predicate.render(collector)
    }
}

impl From<Where> for Predicate {
    fn from(w: Where) -> Self {
        w.into_predicate()
    }
}

impl Predicate {
    /// Renders this predicate as SQL, pushing its parameters in order.
    pub fn render(&self, collector: &mut BindCollector) -> String {
        match self {
            Self::Compare { field, op, value } => {
                let marker = collector.push(value.clone());
                format!("{field} {op} {marker}")
            }
            Self::IsNull { field } => format!("{field} IS NULL"),
            Self::IsNotNull { field } => format!("{field} IS NOT NULL"),
            Self::InList { field, values } => {
                let markers: Vec<String> =
                    values.iter().map(|v| collector.push(v.clone())).collect();
                format!("{field} IN ({})", markers.join(", "))
            }
            Self::NotInList { field, values } => {
                let markers: Vec<String> =
                    values.iter().map(|v| collector.push(v.clone())).collect();
                format!("{field} NOT IN ({})", markers.join(", "))
            }
            Self::Like { field, pattern } => {
                let marker = collector.push(pattern.as_str());
                format!("{field} LIKE {marker}")
            }
            Self::Between { field, low, high } => {
                let low_marker = collector.push(low.clone());
                let high_marker = collector.push(high.clone());
                format!("{field} BETWEEN {low_marker} AND {high_marker}")
            }
            Self::And(left, right) => {
                let left_sql = left.render(collector);
                let right_sql = right.render(collector);
                format!("({left_sql}) AND ({right_sql})")
            }
            Self::Or(left, right) => {
                let left_sql = left.render(collector);
                let right_sql = right.render(collector);
                format!("({left_sql}) OR ({right_sql})")
            }
            Self::Not(inner) => {
                let inner_sql = inner.render(collector);
                format!("NOT ({inner_sql})")
            }
            Self::Raw { sql, params } => {
                for param in params {
                    // Markers are already in the fragment; record values only.
                    let _ = collector.push(param.clone());
                }
                sql.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivet_sql_core::bind::BindStyle;

    fn render(w: &Where) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let sql = w.render(&mut collector);
        (sql, collector.into_values())
    }

    #[test]
    fn simple_eq() {
        let (sql, params) = render(&Where::eq("status", "active"));
        assert_eq!(sql, "status = ?");
        assert_eq!(params, vec![SqlValue::Text(String::from("active"))]);
    }

    #[test]
    fn and_combination() {
        let (sql, params) = render(&Where::eq("status", "active").and(Where::gt("age", 18)));
        assert_eq!(sql, "(status = ?) AND (age > ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn or_combination() {
        let (sql, params) = render(&Where::eq("role", "admin").or(Where::eq("role", "mod")));
        assert_eq!(sql, "(role = ?) OR (role = ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn negation() {
        let (sql, params) = render(&Where::eq("deleted", true).not());
        assert_eq!(sql, "NOT (deleted = ?)");
        assert_eq!(params, vec![SqlValue::Bool(true)]);
    }

    #[test]
    fn nested_expression() {
        let cond = Where::eq("status", "active").and(Where::gt("age", 18).or(Where::eq("vip", true)));
        let (sql, params) = render(&cond);
        assert_eq!(sql, "(status = ?) AND ((age > ?) OR (vip = ?))");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn in_list_markers_match_values() {
        let (sql, params) = render(&Where::in_list("id", vec![1_i64, 2, 3]));
        assert_eq!(sql, "id IN (?, ?, ?)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn between_orders_bounds() {
        let (sql, params) = render(&Where::between("price", 10, 100));
        assert_eq!(sql, "price BETWEEN ? AND ?");
        assert_eq!(params, vec![SqlValue::Int(10), SqlValue::Int(100)]);
    }

    #[test]
    fn null_checks_bind_nothing() {
        let (sql, params) = render(&Where::is_null("deleted_at"));
        assert_eq!(sql, "deleted_at IS NULL");
        assert!(params.is_empty());

        let (sql, _) = render(&Where::is_not_null("deleted_at"));
        assert_eq!(sql, "deleted_at IS NOT NULL");
    }
}
