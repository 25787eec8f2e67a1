//! Model trait and related types.
//!
//! The `Model` trait extends the `Table` trait from rivet-sql-core with the
//! pieces the Manager, Query, and association layers need: a primary key
//! accessor and a way to reach the model's Manager.

use rivet_sql_core::schema::Table;
use rivet_sql_core::value::ToSqlValue;

use crate::manager::Manager;

/// A database model.
///
/// # Example
///
/// ```ignore
/// use rivet_orm::Model;
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// struct Users;
///
/// impl rivet_orm::Table for Users {
///     type Row = User;
///     const NAME: &'static str = "users";
///     const COLUMNS: &'static [&'static str] = &["id", "name"];
///     const PRIMARY_KEY: Option<&'static str> = Some("id");
/// }
///
/// impl Model for User {
///     type Table = Users;
///     type PrimaryKey = i64;
///
///     fn pk_column() -> &'static str {
///         "id"
///     }
///
///     fn pk(&self) -> i64 {
///         self.id
///     }
/// }
///
/// let names = User::objects();
/// ```
pub trait Model: Sized + Send + Sync + 'static {
    /// The table type implementing [`Table`].
    type Table: Table<Row = Self>;

    /// The primary key type.
    type PrimaryKey: ToSqlValue + Clone + Send + Sync;

    /// Returns the table name.
    fn table_name() -> &'static str {
        Self::Table::NAME
    }

    /// Returns all column names.
    fn columns() -> &'static [&'static str] {
        Self::Table::COLUMNS
    }

    /// Returns the primary key column name.
    fn pk_column() -> &'static str;

    /// Returns the primary key value for this instance.
    fn pk(&self) -> Self::PrimaryKey;

    /// Returns a new Manager for this model.
    fn objects() -> Manager<Self> {
        Manager::new()
    }
}
