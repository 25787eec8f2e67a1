//! Db2 for IBM i dialect implementation.

use rivet_sql_core::bind::BindStyle;
use rivet_sql_core::dialect::{
    AutoIncrementSupport, ConstraintSupport, Dialect, DialectSupports, IndexSupport,
};
use rivet_sql_core::schema::DataType;
use rivet_sql_core::value::hex_encode;

use crate::types::map_type;

/// Capability table for Db2 for IBM i.
///
/// Flags describe what query generation may emit through the i Access ODBC
/// driver, which is stricter than the engine itself in places (it
/// autocommits, so dialect-level transaction control is off).
pub const DB2I_SUPPORTS: DialectSupports = DialectSupports {
    transactions: false,
    savepoints: false,
    returning: false,
    upserts: false,
    on_duplicate_key: false,
    values_row_constructor: true,
    schemas: true,
    grouped_limit: false,
    json: false,
    limit_offset: true,
    auto_increment: AutoIncrementSupport {
        identity_insert: true,
        default_value: false,
        update: false,
    },
    index: IndexSupport {
        using: false,
        where_clause: true,
        function_based: true,
        collate: false,
        include: false,
    },
    constraints: ConstraintSupport {
        on_update: false,
        deferrable: false,
    },
};

/// Db2 for IBM i dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct Db2iDialect;

impl Db2iDialect {
    /// Creates a new Db2 for i dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for Db2iDialect {
    fn name(&self) -> &'static str {
        "ibmi"
    }

    fn supports(&self) -> &'static DialectSupports {
        &DB2I_SUPPORTS
    }

    fn identifier_quote(&self) -> char {
        '"'
    }

    fn bind_style(&self) -> BindStyle {
        // The driver binds unnamed positional markers only.
        BindStyle::Positional
    }

    fn escape_buffer(&self, bytes: &[u8]) -> String {
        // The engine rejects a bare hex string where a blob is expected;
        // it must be wrapped in the BLOB scalar.
        format!("BLOB(X'{}')", hex_encode(bytes))
    }

    fn default_schema(&self) -> &'static str {
        // The default collection is the connecting user profile, resolved
        // server-side; there is nothing to name statically.
        ""
    }

    fn map_data_type(&self, dt: &DataType) -> String {
        map_type(dt)
    }

    fn autoincrement_keyword(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY (START WITH 1, INCREMENT BY 1)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_identity() {
        let dialect = Db2iDialect::new();
        assert_eq!(dialect.name(), "ibmi");
        assert_eq!(dialect.identifier_quote(), '"');
        assert_eq!(dialect.string_escape(), "''");
    }

    #[test]
    fn capability_table() {
        let supports = Db2iDialect::new().supports();
        assert!(!supports.transactions);
        assert!(!supports.upserts);
        assert!(!supports.on_duplicate_key);
        assert!(supports.values_row_constructor);
        assert!(supports.schemas);
        assert!(!supports.grouped_limit);
        assert!(supports.auto_increment.identity_insert);
        assert!(!supports.auto_increment.default_value);
        assert!(!supports.auto_increment.update);
        assert!(!supports.index.using);
        assert!(supports.index.where_clause);
        assert!(supports.index.function_based);
        assert!(!supports.index.collate);
        assert!(!supports.index.include);
        assert!(!supports.constraints.on_update);
    }

    #[test]
    fn bind_collector_is_positional() {
        let mut collector = Db2iDialect::new().bind_collector();
        assert_eq!(collector.push(1_i64), "?");
        assert_eq!(collector.push("x"), "?");
        assert_eq!(collector.into_values().len(), 2);
    }

    #[test]
    fn buffer_literal_wraps_blob_scalar() {
        let dialect = Db2iDialect::new();
        assert_eq!(dialect.escape_buffer(b"rivet"), "BLOB(X'7269766574')");
        assert_eq!(dialect.escape_buffer(&[]), "BLOB(X'')");
    }

    #[test]
    fn default_schema_is_resolved_server_side() {
        assert_eq!(Db2iDialect::new().default_schema(), "");
    }

    #[test]
    fn quotes_identifiers_with_double_quotes() {
        let dialect = Db2iDialect::new();
        assert_eq!(dialect.quote_identifier("ORDERS"), "\"ORDERS\"");
        assert_eq!(dialect.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
