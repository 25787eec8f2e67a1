//! # rivet-sql-db2i
//!
//! Db2 for IBM i dialect adapter for the rivet ORM.
//!
//! This crate customizes SQL generation for the midrange platform: a
//! capability table describing what the engine (as reached through the
//! i Access ODBC driver) supports, positional parameter binding, inline
//! `BLOB(X'..')` buffer literals, and the platform's type-name mapping.
//!
//! ```rust
//! use rivet_sql_core::dialect::Dialect;
//! use rivet_sql_db2i::Db2iDialect;
//!
//! let dialect = Db2iDialect::new();
//! assert_eq!(dialect.name(), "ibmi");
//! assert!(!dialect.supports().upserts);
//! ```

mod dialect;
mod types;

pub use dialect::{Db2iDialect, DB2I_SUPPORTS};
