//! # rivet-sql-core
//!
//! Backend-neutral building blocks for the rivet ORM.
//!
//! This crate provides:
//! - The [`Dialect`] trait and its [`DialectSupports`] capability table,
//!   consumed by SQL-string assembly in higher layers
//! - [`SqlValue`] and [`ToSqlValue`] for safe parameter handling
//! - [`BindCollector`] for ordering parameterized query placeholders
//! - The [`Table`] schema trait implemented by models
//!
//! ## Dialects and capabilities
//!
//! Query generation never branches on a backend's name; it consults the
//! backend's capability table instead:
//!
//! ```rust
//! use rivet_sql_core::dialect::{Dialect, GenericDialect};
//!
//! let dialect = GenericDialect::new();
//! if dialect.supports().upserts {
//!     // emit ON CONFLICT ...
//! }
//! ```
//!
//! ## Parameter collection
//!
//! A [`BindCollector`] hands out placeholder text in push order, so the SQL
//! string and the parameter list can never drift apart:
//!
//! ```rust
//! use rivet_sql_core::bind::{BindCollector, BindStyle};
//!
//! let mut collector = BindCollector::new(BindStyle::Numbered);
//! let p1 = collector.push("alice");
//! let p2 = collector.push(42_i64);
//! assert_eq!((p1.as_str(), p2.as_str()), ("$1", "$2"));
//! assert_eq!(collector.into_values().len(), 2);
//! ```

pub mod bind;
pub mod dialect;
pub mod schema;
pub mod value;

pub use bind::{BindCollector, BindStyle};
pub use dialect::{Dialect, DialectSupports, GenericDialect};
pub use schema::{DataType, Table};
pub use value::{SqlValue, ToSqlValue};
