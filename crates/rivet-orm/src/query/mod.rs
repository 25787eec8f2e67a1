//! Lazy, chainable queries.
//!
//! A [`Query`] accumulates filters, ordering, and pagination without
//! touching the database; executing methods (`find_all`, `count`,
//! `update`, ...) assemble the SQL and run it. Builders are exposed
//! separately so SQL assembly stays testable without a pool.

mod filter;

pub use filter::{CompareOp, Predicate, Where};

use std::fmt::Write as _;
use std::marker::PhantomData;

use rivet_sql_core::bind::{BindCollector, BindStyle};
use rivet_sql_core::value::SqlValue;
use sqlx::{FromRow, Row, SqlitePool};
use tracing::debug;

use crate::error::{OrmError, Result};
use crate::model::Model;

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// An ordering specification.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Column to order by.
    pub column: String,
    /// Order direction.
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Creates an ascending order specification.
    #[must_use]
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a descending order specification.
    #[must_use]
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parses an order specification; prefix with `-` for descending.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        spec.strip_prefix('-')
            .map_or_else(|| Self::asc(spec), Self::desc)
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.direction {
            OrderDirection::Asc => format!("{} ASC", self.column),
            OrderDirection::Desc => format!("{} DESC", self.column),
        }
    }
}

/// A lazy, chainable query over one model's table.
///
/// Queries are immutable in spirit: chaining methods consume and return the
/// query, and `clone` forks it.
///
/// # Example
///
/// ```ignore
/// let tasks = Task::objects()
///     .filter(Where::eq("done", false))
///     .order_by("-created_at")
///     .limit(10)
///     .find_all(&pool)
///     .await?;
/// ```
#[derive(Debug)]
pub struct Query<M: Model> {
    wheres: Vec<Predicate>,
    excludes: Vec<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<i64>,
    offset: Option<i64>,
    select_columns: Option<Vec<String>>,
    distinct: bool,
    _marker: PhantomData<M>,
}

// Manual Clone implementation to avoid an M: Clone bound
impl<M: Model> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            wheres: self.wheres.clone(),
            excludes: self.excludes.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            select_columns: self.select_columns.clone(),
            distinct: self.distinct,
            _marker: PhantomData,
        }
    }
}

impl<M: Model> Default for Query<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Query<M> {
    /// Creates a new empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wheres: Vec::new(),
            excludes: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            select_columns: None,
            distinct: false,
            _marker: PhantomData,
        }
    }

    /// Adds a filter; multiple filters are combined with AND.
    #[must_use]
    pub fn filter(mut self, cond: Where) -> Self {
        self.wheres.push(cond.into_predicate());
        self
    }

    /// Adds an exclusion; matching rows are dropped from the result.
    #[must_use]
    pub fn exclude(mut self, cond: Where) -> Self {
        self.excludes.push(cond.into_predicate());
        self
    }

    /// Appends an ordering; prefix the column with `-` for descending.
    #[must_use]
    pub fn order_by(mut self, spec: &str) -> Self {
        self.order_by.push(OrderBy::parse(spec));
        self
    }

    /// Limits the number of results.
    #[must_use]
    pub const fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub const fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Selects specific columns.
    #[must_use]
    pub fn only(mut self, columns: &[&str]) -> Self {
        self.select_columns = Some(columns.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Makes the query return distinct rows.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Returns a query that matches nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::new().filter(Where::raw("1 = 0", vec![]))
    }

    /// Renders the WHERE clause, or `""` when unfiltered.
    fn render_where(&self, collector: &mut BindCollector) -> String {
        let mut conditions = Vec::new();

        for cond in &self.wheres {
            conditions.push(cond.render(collector));
        }
        for cond in &self.excludes {
            conditions.push(format!("NOT ({})", cond.render(collector)));
        }

        conditions.join(" AND ")
    }

    /// Builds the SELECT statement and its parameters.
    #[must_use]
    pub fn build_select(&self) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let mut sql = String::from("SELECT ");

        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        match &self.select_columns {
            Some(cols) => sql.push_str(&cols.join(", ")),
            None => sql.push_str(&M::columns().join(", ")),
        }

        sql.push_str(" FROM ");
        sql.push_str(M::table_name());

        let where_clause = self.render_where(&mut collector);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let parts: Vec<String> = self.order_by.iter().map(OrderBy::to_sql).collect();
            sql.push_str(&parts.join(", "));
        }

        if let Some(limit) = self.limit {
            let _ = write!(sql, " LIMIT {limit}");
        }
        if let Some(offset) = self.offset {
            let _ = write!(sql, " OFFSET {offset}");
        }

        (sql, collector.into_values())
    }

    /// Builds the COUNT statement and its parameters.
    #[must_use]
    pub fn build_count(&self) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let mut sql = String::from("SELECT COUNT(*) FROM ");
        sql.push_str(M::table_name());

        let where_clause = self.render_where(&mut collector);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        (sql, collector.into_values())
    }

    /// Builds the DELETE statement and its parameters.
    #[must_use]
    pub fn build_delete(&self) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(M::table_name());

        let where_clause = self.render_where(&mut collector);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        (sql, collector.into_values())
    }

    /// Builds an UPDATE statement setting the given assignments on every
    /// matching row. SET parameters precede WHERE parameters.
    #[must_use]
    pub fn build_update(&self, assignments: &[(&str, SqlValue)]) -> (String, Vec<SqlValue>) {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let mut sql = String::from("UPDATE ");
        sql.push_str(M::table_name());
        sql.push_str(" SET ");

        let set_parts: Vec<String> = assignments
            .iter()
            .map(|(column, value)| {
                let marker = collector.push(value.clone());
                format!("{column} = {marker}")
            })
            .collect();
        sql.push_str(&set_parts.join(", "));

        let where_clause = self.render_where(&mut collector);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        (sql, collector.into_values())
    }
}

/// Async execution methods.
impl<M: Model + for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Unpin> Query<M> {
    /// Executes the query and returns all matching rows.
    pub async fn find_all(&self, pool: &SqlitePool) -> Result<Vec<M>> {
        let (sql, params) = self.build_select();
        let mut query = sqlx::query_as::<_, M>(&sql);
        for param in params {
            query = bind_value(query, param);
        }
        Ok(query.fetch_all(pool).await?)
    }

    /// Returns the first matching row, or `None`.
    pub async fn find_one(&self, pool: &SqlitePool) -> Result<Option<M>> {
        let limited = self.clone().limit(1);
        let (sql, params) = limited.build_select();
        let mut query = sqlx::query_as::<_, M>(&sql);
        for param in params {
            query = bind_value(query, param);
        }
        Ok(query.fetch_optional(pool).await?)
    }

    /// Returns exactly one matching row; errors on zero or several.
    pub async fn get(&self, pool: &SqlitePool) -> Result<M> {
        let limited = self.clone().limit(2);
        let mut rows = limited.find_all(pool).await?;
        match rows.len() {
            0 => Err(OrmError::NotFound),
            1 => Ok(rows.remove(0)),
            _ => Err(OrmError::MultipleObjectsReturned),
        }
    }

    /// Returns the count of matching rows.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64> {
        let (sql, params) = self.build_count();
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_value_raw(query, param);
        }
        let row = query.fetch_one(pool).await?;
        Ok(row.get(0))
    }

    /// Returns whether any rows match.
    pub async fn exists(&self, pool: &SqlitePool) -> Result<bool> {
        Ok(self.count(pool).await? > 0)
    }

    /// Returns the primary keys of matching rows, honoring ordering.
    pub async fn pluck_ids(&self, pool: &SqlitePool) -> Result<Vec<i64>> {
        let projected = self.clone().only(&[M::pk_column()]);
        let (sql, params) = projected.build_select();
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_value_raw(query, param);
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    /// Updates every matching row and returns the affected count.
    pub async fn update(
        &self,
        pool: &SqlitePool,
        assignments: &[(&str, SqlValue)],
    ) -> Result<u64> {
        let (sql, params) = self.build_update(assignments);
        debug!(table = M::table_name(), sql = %sql, "bulk update");
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_value_raw(query, param);
        }
        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Deletes every matching row and returns the affected count.
    pub async fn delete(&self, pool: &SqlitePool) -> Result<u64> {
        let (sql, params) = self.build_delete();
        debug!(table = M::table_name(), sql = %sql, "bulk delete");
        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_value_raw(query, param);
        }
        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}

/// Binds a [`SqlValue`] parameter to a `query_as` query.
pub(crate) fn bind_value<'q, M>(
    query: sqlx::query::QueryAs<'q, sqlx::Sqlite, M, sqlx::sqlite::SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, M, sqlx::sqlite::SqliteArguments<'q>>
where
    M: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow>,
{
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

/// Binds a [`SqlValue`] parameter to a raw query.
pub(crate) fn bind_value_raw<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}
