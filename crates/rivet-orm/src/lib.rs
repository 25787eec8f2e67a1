//! # rivet-orm
//!
//! An async ORM layer with lazy queries and declared associations.
//!
//! This crate provides:
//! - The `Model` trait for database models
//! - `Manager` for table-level access patterns
//! - `Query` for lazy, chainable queries with bulk UPDATE/DELETE
//! - `Where` expressions for composable filters
//! - hasMany associations with inferred foreign keys, generated accessor
//!   names, bulk set semantics, and declaration hooks
//!
//! ## Quick start
//!
//! ```ignore
//! use rivet_orm::{AssociationRegistry, HasManyOptions, Model, Where};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> rivet_orm::Result<()> {
//!     // Lazy queries
//!     let open = Task::objects()
//!         .filter(Where::eq("done", false))
//!         .order_by("-id")
//!         .limit(10)
//!         .find_all(pool)
//!         .await?;
//!
//!     // Associations
//!     let registry = AssociationRegistry::new();
//!     let tasks = registry.has_many::<User, Task>(HasManyOptions::new())?;
//!
//!     let user = User::objects().get(pool, 1).await?;
//!     let accessor = tasks.accessor_for(&user);
//!     accessor.add(pool, &[3, 4]).await?;
//!     accessor.set(pool, &[4, 5]).await?; // diffed: releases 3, claims 5
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Associations
//!
//! A declaration records metadata, never touching the database:
//!
//! ```ignore
//! let assoc = registry.has_many::<User, Task>(
//!     HasManyOptions::new().alias("chores"),
//! )?;
//! assert_eq!(assoc.foreign_key(), "user_id"); // inferred
//! assert_eq!(assoc.accessors().add, "add_chore");
//! ```
//!
//! Bulk mutation goes through the accessor: `set` diffs current membership
//! against the desired one and issues at most two UPDATEs.

mod error;
mod manager;
mod model;
mod query;

pub mod associations;

pub use associations::{
    AccessorNames, AssociationEvent, AssociationRegistry, HasMany, HasManyAccessor,
    HasManyOptions, InferredAttribute, SetChanges,
};
pub use error::{OrmError, Result};
pub use manager::Manager;
pub use model::Model;
pub use query::{CompareOp, OrderBy, OrderDirection, Predicate, Query, Where};

// Re-export commonly used types from rivet-sql-core
pub use rivet_sql_core::schema::Table;
pub use rivet_sql_core::value::{SqlValue, ToSqlValue};
