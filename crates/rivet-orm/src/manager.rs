//! Manager for database access.
//!
//! The Manager is the entry point for table-level operations on a model:
//! query construction, primary-key lookups, and row creation.

use rivet_sql_core::bind::{BindCollector, BindStyle};
use rivet_sql_core::value::{SqlValue, ToSqlValue};
use sqlx::{FromRow, SqlitePool};
use std::marker::PhantomData;
use tracing::debug;

use crate::error::{OrmError, Result};
use crate::model::Model;
use crate::query::{bind_value_raw, Query, Where};

/// Provides database access methods for a model.
///
/// Each model reaches its Manager via `Model::objects()`. Managers are
/// zero-sized and can be created freely.
///
/// # Example
///
/// ```ignore
/// // All rows
/// let tasks = Task::objects().all().find_all(&pool).await?;
///
/// // By primary key
/// let task = Task::objects().get(&pool, 1).await?;
///
/// // New row from a values bag
/// let id = Task::objects()
///     .create(&pool, &[("title", SqlValue::Text("write docs".into()))])
///     .await?;
/// ```
#[derive(Debug)]
pub struct Manager<M: Model> {
    _marker: PhantomData<M>,
}

impl<M: Model> Clone for Manager<M> {
    fn clone(&self) -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<M: Model> Copy for Manager<M> {}

impl<M: Model> Default for Manager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Manager<M> {
    /// Creates a new Manager.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Returns a query over all rows.
    #[must_use]
    pub fn all(&self) -> Query<M> {
        Query::new()
    }

    /// Returns a query filtered by the given condition.
    #[must_use]
    pub fn filter(&self, cond: Where) -> Query<M> {
        Query::new().filter(cond)
    }

    /// Returns a query excluding rows matching the condition.
    #[must_use]
    pub fn exclude(&self, cond: Where) -> Query<M> {
        Query::new().exclude(cond)
    }

    /// Returns a query that matches nothing.
    #[must_use]
    pub fn none(&self) -> Query<M> {
        Query::none()
    }

    /// Builds a single-row INSERT from a values bag.
    fn build_insert(values: &[(&str, SqlValue)]) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
        let markers: Vec<String> = values
            .iter()
            .map(|(_, value)| collector.push(value.clone()))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            M::table_name(),
            columns.join(", "),
            markers.join(", ")
        );
        (sql, collector.into_values())
    }

    /// Builds a multi-row INSERT using VALUES row constructors.
    fn build_bulk_insert(
        columns: &[&str],
        rows: &[Vec<SqlValue>],
    ) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let mut row_groups = Vec::with_capacity(rows.len());
        for row in rows {
            let markers: Vec<String> =
                row.iter().map(|value| collector.push(value.clone())).collect();
            row_groups.push(format!("({})", markers.join(", ")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            M::table_name(),
            columns.join(", "),
            row_groups.join(", ")
        );
        (sql, collector.into_values())
    }
}

/// Async methods for Manager.
impl<M: Model + for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Unpin> Manager<M> {
    /// Gets a row by its primary key.
    pub async fn get(&self, pool: &SqlitePool, pk: M::PrimaryKey) -> Result<M> {
        self.get_or_none(pool, pk).await?.ok_or(OrmError::NotFound)
    }

    /// Gets a row by its primary key, returning `None` if absent.
    pub async fn get_or_none(&self, pool: &SqlitePool, pk: M::PrimaryKey) -> Result<Option<M>> {
        self.filter(Where::eq(M::pk_column(), pk.to_sql_value()))
            .find_one(pool)
            .await
    }

    /// Returns the count of all rows.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64> {
        self.all().count(pool).await
    }

    /// Returns whether any rows exist.
    pub async fn exists(&self, pool: &SqlitePool) -> Result<bool> {
        self.all().exists(pool).await
    }

    /// Returns the first row by primary key order, or `None`.
    pub async fn first(&self, pool: &SqlitePool) -> Result<Option<M>> {
        self.all().order_by(M::pk_column()).find_one(pool).await
    }

    /// Returns the last row by primary key order, or `None`.
    pub async fn last(&self, pool: &SqlitePool) -> Result<Option<M>> {
        self.all()
            .order_by(&format!("-{}", M::pk_column()))
            .find_one(pool)
            .await
    }

    /// Inserts a row from a values bag and returns its rowid.
    pub async fn create(
        &self,
        pool: &SqlitePool,
        values: &[(&str, SqlValue)],
    ) -> Result<i64> {
        let (sql, params) = Self::build_insert(values);
        debug!(table = M::table_name(), sql = %sql, "insert");
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_value_raw(query, param);
        }
        let result = query.execute(pool).await?;
        Ok(result.last_insert_rowid())
    }

    /// Inserts several rows in one statement and returns the count.
    ///
    /// Every row must supply one value per column, in column order.
    pub async fn bulk_create(
        &self,
        pool: &SqlitePool,
        columns: &[&str],
        rows: &[Vec<SqlValue>],
    ) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        for row in rows {
            if row.len() != columns.len() {
                return Err(OrmError::Query(format!(
                    "bulk create row has {} values for {} columns",
                    row.len(),
                    columns.len()
                )));
            }
        }

        let (sql, params) = Self::build_bulk_insert(columns, rows);
        debug!(table = M::table_name(), rows = rows.len(), "bulk insert");
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_value_raw(query, param);
        }
        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Task;

    impl Model for Task {
        type Table = Tasks;
        type PrimaryKey = i64;

        fn pk_column() -> &'static str {
            "id"
        }

        fn pk(&self) -> i64 {
            0
        }
    }

    struct Tasks;

    impl rivet_sql_core::schema::Table for Tasks {
        type Row = Task;
        const NAME: &'static str = "tasks";
        const COLUMNS: &'static [&'static str] = &["id", "title", "user_id"];
        const PRIMARY_KEY: Option<&'static str> = Some("id");
    }

    #[test]
    fn insert_statement_shape() {
        let (sql, params) = Manager::<Task>::build_insert(&[
            ("title", SqlValue::Text(String::from("a"))),
            ("user_id", SqlValue::Int(1)),
        ]);
        assert_eq!(sql, "INSERT INTO tasks (title, user_id) VALUES (?, ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn bulk_insert_uses_row_constructors() {
        let rows = vec![
            vec![SqlValue::Text(String::from("a")), SqlValue::Int(1)],
            vec![SqlValue::Text(String::from("b")), SqlValue::Null],
        ];
        let (sql, params) = Manager::<Task>::build_bulk_insert(&["title", "user_id"], &rows);
        assert_eq!(
            sql,
            "INSERT INTO tasks (title, user_id) VALUES (?, ?), (?, ?)"
        );
        assert_eq!(params.len(), 4);
    }
}
