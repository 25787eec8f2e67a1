//! Schema traits and column type descriptions.

/// Trait for table metadata.
///
/// Implemented by models (or generated table marker types) to give query
/// assembly table-level information without runtime reflection.
pub trait Table {
    /// The row type.
    type Row;

    /// The SQL table name.
    const NAME: &'static str;

    /// List of all column names.
    const COLUMNS: &'static [&'static str];

    /// The primary key column name, if any.
    const PRIMARY_KEY: Option<&'static str>;
}

/// A backend-neutral column type, mapped to concrete SQL type names by each
/// [`crate::dialect::Dialect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 16-bit integer.
    Smallint,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Bigint,
    /// Single-precision float.
    Real,
    /// Double-precision float.
    Double,
    /// Fixed-point decimal with optional precision and scale.
    Decimal {
        /// Total digits.
        precision: Option<u32>,
        /// Digits right of the decimal point.
        scale: Option<u32>,
    },
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Unbounded character data.
    Text,
    /// Binary large object.
    Blob,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Boolean.
    Boolean,
    /// A dialect-specific type passed through verbatim.
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Users;

    impl Table for Users {
        type Row = ();
        const NAME: &'static str = "users";
        const COLUMNS: &'static [&'static str] = &["id", "name"];
        const PRIMARY_KEY: Option<&'static str> = Some("id");
    }

    #[test]
    fn table_metadata() {
        assert_eq!(Users::NAME, "users");
        assert_eq!(Users::COLUMNS, &["id", "name"]);
        assert_eq!(Users::PRIMARY_KEY, Some("id"));
    }

    #[test]
    fn custom_data_type_carries_name() {
        let dt = DataType::Custom(String::from("DATALINK"));
        assert_eq!(dt, DataType::Custom(String::from("DATALINK")));
    }
}
