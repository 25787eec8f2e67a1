//! Error types for the ORM.

use std::fmt;

/// ORM-specific errors.
#[derive(Debug)]
pub enum OrmError {
    /// Database error from sqlx.
    Database(sqlx::Error),

    /// No row found matching the query.
    NotFound,

    /// Multiple rows found when exactly one was expected.
    MultipleObjectsReturned,

    /// An association alias was declared twice from the same source.
    AliasInUse {
        /// Source table of the colliding declarations.
        source: String,
        /// The alias used twice.
        alias: String,
    },

    /// A model was associated with itself without an explicit alias.
    SelfReferenceWithoutAlias {
        /// The self-associated table.
        table: String,
    },

    /// An association declaration was structurally invalid.
    InvalidAssociation(String),

    /// Query construction error.
    Query(String),
}

impl fmt::Display for OrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(e) => write!(f, "database error: {e}"),
            Self::NotFound => write!(f, "object not found"),
            Self::MultipleObjectsReturned => {
                write!(f, "multiple objects returned when one was expected")
            }
            Self::AliasInUse { source, alias } => write!(
                f,
                "alias {alias:?} is already used by another association on {source}"
            ),
            Self::SelfReferenceWithoutAlias { table } => {
                write!(f, "{table} is associated with itself; an explicit alias is required")
            }
            Self::InvalidAssociation(msg) => write!(f, "invalid association: {msg}"),
            Self::Query(msg) => write!(f, "query error: {msg}"),
        }
    }
}

impl std::error::Error for OrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for OrmError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e)
    }
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, OrmError>;
