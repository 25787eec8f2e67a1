//! Db2 for i type-name mapping.

use rivet_sql_core::schema::DataType;

/// Maps a backend-neutral type to the Db2 for i SQL type name.
///
/// Quirks relative to ANSI: no native BOOLEAN (SMALLINT stands in),
/// unbounded text is CLOB, and VARCHAR requires an explicit length.
pub(crate) fn map_type(dt: &DataType) -> String {
    match dt {
        DataType::Smallint | DataType::Boolean => String::from("SMALLINT"),
        DataType::Integer => String::from("INTEGER"),
        DataType::Bigint => String::from("BIGINT"),
        DataType::Real => String::from("REAL"),
        DataType::Double => String::from("DOUBLE"),
        DataType::Decimal { precision, scale } => {
            let p = precision.unwrap_or(10);
            let s = scale.unwrap_or(0);
            format!("DECIMAL({p}, {s})")
        }
        DataType::Char(len) => format!("CHAR({})", len.unwrap_or(1)),
        DataType::Varchar(len) => format!("VARCHAR({})", len.unwrap_or(255)),
        DataType::Text => String::from("CLOB"),
        DataType::Blob => String::from("BLOB"),
        DataType::Date => String::from("DATE"),
        DataType::Time => String::from("TIME"),
        DataType::Timestamp => String::from("TIMESTAMP"),
        DataType::Custom(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Db2iDialect;
    use rivet_sql_core::dialect::Dialect;

    #[test]
    fn boolean_becomes_smallint() {
        assert_eq!(map_type(&DataType::Boolean), "SMALLINT");
    }

    #[test]
    fn text_becomes_clob() {
        assert_eq!(map_type(&DataType::Text), "CLOB");
    }

    #[test]
    fn varchar_always_gets_a_length() {
        assert_eq!(map_type(&DataType::Varchar(None)), "VARCHAR(255)");
        assert_eq!(map_type(&DataType::Varchar(Some(120))), "VARCHAR(120)");
        assert_eq!(map_type(&DataType::Char(None)), "CHAR(1)");
    }

    #[test]
    fn decimal_defaults() {
        assert_eq!(
            map_type(&DataType::Decimal {
                precision: None,
                scale: None
            }),
            "DECIMAL(10, 0)"
        );
    }

    #[test]
    fn identity_keyword_allows_explicit_insert() {
        let dialect = Db2iDialect::new();
        assert!(dialect.autoincrement_keyword().starts_with("GENERATED BY DEFAULT"));
        assert!(dialect.supports().auto_increment.identity_insert);
    }

    #[test]
    fn double_has_no_precision_suffix() {
        assert_eq!(map_type(&DataType::Double), "DOUBLE");
    }
}
