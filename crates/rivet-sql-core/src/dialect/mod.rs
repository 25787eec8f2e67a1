//! SQL dialect support.
//!
//! Different databases have slightly different SQL syntax and different
//! feature sets. This module provides a trait for dialect-specific behavior
//! plus the capability table query generation consults before emitting a
//! construct.

mod generic;

pub use generic::GenericDialect;

use crate::bind::{BindCollector, BindStyle};
use crate::schema::DataType;
use crate::value::hex_encode;

/// Auto-increment capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoIncrementSupport {
    /// Whether explicit values may be inserted into an identity column.
    pub identity_insert: bool,
    /// Whether an identity column may also carry a DEFAULT expression.
    pub default_value: bool,
    /// Whether an identity column may be updated.
    pub update: bool,
}

/// Index-option capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSupport {
    /// `CREATE INDEX ... USING <method>`.
    pub using: bool,
    /// Partial indexes (`CREATE INDEX ... WHERE ...`).
    pub where_clause: bool,
    /// Indexes over expressions rather than plain columns.
    pub function_based: bool,
    /// Per-index collation.
    pub collate: bool,
    /// Covering indexes (`INCLUDE (...)`).
    pub include: bool,
}

/// Constraint-handling capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintSupport {
    /// `ON UPDATE <action>` on foreign keys.
    pub on_update: bool,
    /// Deferrable constraint checking.
    pub deferrable: bool,
}

/// The feature-flag table a dialect exposes to query generation.
///
/// Each flag answers "may the generator emit this construct for this
/// backend"; the generator never branches on a dialect's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectSupports {
    /// Whether the dialect layer may issue transaction control statements.
    pub transactions: bool,
    /// SAVEPOINT / ROLLBACK TO SAVEPOINT.
    pub savepoints: bool,
    /// `RETURNING` clause on DML.
    pub returning: bool,
    /// Native upsert (`ON CONFLICT ... DO UPDATE`).
    pub upserts: bool,
    /// MySQL-style `ON DUPLICATE KEY UPDATE`.
    pub on_duplicate_key: bool,
    /// `VALUES (...), (...)` row constructors in INSERT.
    pub values_row_constructor: bool,
    /// Multiple schemas per database.
    pub schemas: bool,
    /// LIMIT applied per group in eager-loading queries.
    pub grouped_limit: bool,
    /// Native JSON column type.
    pub json: bool,
    /// `LIMIT n OFFSET m`.
    pub limit_offset: bool,
    /// Auto-increment behavior.
    pub auto_increment: AutoIncrementSupport,
    /// Index options.
    pub index: IndexSupport,
    /// Constraint handling.
    pub constraints: ConstraintSupport,
}

/// The ANSI baseline capability table.
///
/// Conservative by construction: a dialect turns features on, the baseline
/// never assumes them.
pub const ANSI_SUPPORTS: DialectSupports = DialectSupports {
    transactions: true,
    savepoints: true,
    returning: false,
    upserts: false,
    on_duplicate_key: false,
    values_row_constructor: true,
    schemas: false,
    grouped_limit: false,
    json: false,
    limit_offset: true,
    auto_increment: AutoIncrementSupport {
        identity_insert: false,
        default_value: true,
        update: false,
    },
    index: IndexSupport {
        using: false,
        where_clause: false,
        function_based: false,
        collate: false,
        include: false,
    },
    constraints: ConstraintSupport {
        on_update: true,
        deferrable: false,
    },
};

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the capability table for this dialect.
    fn supports(&self) -> &'static DialectSupports {
        &ANSI_SUPPORTS
    }

    /// Returns the identifier quote character (e.g., `"` for standard SQL,
    /// `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the string escape sequence for a single quote.
    fn string_escape(&self) -> &'static str {
        "''"
    }

    /// Returns the placeholder family this backend binds with.
    fn bind_style(&self) -> BindStyle {
        BindStyle::Positional
    }

    /// Returns a fresh bind collector in this dialect's style.
    fn bind_collector(&self) -> BindCollector {
        BindCollector::new(self.bind_style())
    }

    /// Renders a binary value as an inline literal.
    ///
    /// Used where a driver cannot bind a blob at a given position. The
    /// standard form is a hex string literal.
    fn escape_buffer(&self, bytes: &[u8]) -> String {
        format!("X'{}'", hex_encode(bytes))
    }

    /// Returns the schema unqualified statements resolve against, or `""`
    /// when the backend resolves it server-side.
    fn default_schema(&self) -> &'static str {
        ""
    }

    /// Quotes an identifier, escaping embedded quote characters by doubling.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }

    /// Maps a backend-neutral column type to this dialect's SQL type name.
    fn map_data_type(&self, dt: &DataType) -> String {
        match dt {
            DataType::Smallint => String::from("SMALLINT"),
            DataType::Integer => String::from("INTEGER"),
            DataType::Bigint => String::from("BIGINT"),
            DataType::Real => String::from("REAL"),
            DataType::Double => String::from("DOUBLE PRECISION"),
            DataType::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            DataType::Char(len) => {
                len.map_or_else(|| String::from("CHAR"), |n| format!("CHAR({n})"))
            }
            DataType::Varchar(len) => {
                len.map_or_else(|| String::from("VARCHAR"), |n| format!("VARCHAR({n})"))
            }
            DataType::Text => String::from("TEXT"),
            DataType::Blob => String::from("BLOB"),
            DataType::Date => String::from("DATE"),
            DataType::Time => String::from("TIME"),
            DataType::Timestamp => String::from("TIMESTAMP"),
            DataType::Boolean => String::from("BOOLEAN"),
            DataType::Custom(name) => name.clone(),
        }
    }

    /// Returns the keyword that makes a primary key auto-increment, or `""`
    /// when the dialect expresses it through the type instead.
    fn autoincrement_keyword(&self) -> &'static str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Dialect for Plain {
        fn name(&self) -> &'static str {
            "plain"
        }
    }

    #[test]
    fn default_quoting_doubles_embedded_quotes() {
        let d = Plain;
        assert_eq!(d.quote_identifier("users"), "\"users\"");
        assert_eq!(d.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn default_buffer_escape_is_hex_literal() {
        let d = Plain;
        assert_eq!(d.escape_buffer(&[0x01, 0xFF]), "X'01FF'");
        assert_eq!(d.escape_buffer(&[]), "X''");
    }

    #[test]
    fn ansi_baseline_is_conservative() {
        let supports = Plain.supports();
        assert!(supports.transactions);
        assert!(!supports.upserts);
        assert!(!supports.returning);
        assert!(!supports.index.include);
    }

    #[test]
    fn default_bind_collector_is_positional() {
        let mut collector = Plain.bind_collector();
        assert_eq!(collector.push(1_i64), "?");
    }

    #[test]
    fn default_type_map_is_ansi() {
        let d = Plain;
        assert_eq!(d.map_data_type(&DataType::Boolean), "BOOLEAN");
        assert_eq!(d.map_data_type(&DataType::Varchar(Some(80))), "VARCHAR(80)");
        assert_eq!(
            d.map_data_type(&DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }),
            "DECIMAL(10, 2)"
        );
    }
}
