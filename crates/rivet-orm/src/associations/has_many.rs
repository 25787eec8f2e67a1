//! hasMany association metadata and accessors.
//!
//! A [`HasMany`] is the recorded declaration: which table owns which, over
//! which foreign key, under which alias. A [`HasManyAccessor`] binds that
//! declaration to one source row and exposes the relationship operations
//! (fetch, add, remove, set, create, membership, count).

use std::collections::HashSet;

use rivet_sql_core::bind::{BindCollector, BindStyle};
use rivet_sql_core::value::{SqlValue, ToSqlValue};
use sqlx::{FromRow, Row, SqlitePool};
use tracing::debug;

use crate::error::Result;
use crate::model::Model;
use crate::query::{bind_value_raw, Query, Where};

use super::{singularize, InferredAttribute};

/// The accessor-method names an association installs.
///
/// Rust cannot attach methods to a type at runtime; the installed names are
/// carried as data (and used verbatim by code generators and diagnostics),
/// while the behavior lives on [`HasManyAccessor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorNames {
    /// Fetch all associated rows.
    pub get: String,
    /// Replace the associated set.
    pub set: String,
    /// Associate one row.
    pub add: String,
    /// Associate several rows.
    pub add_multiple: String,
    /// Disassociate one row.
    pub remove: String,
    /// Disassociate several rows.
    pub remove_multiple: String,
    /// Membership test for one row.
    pub has: String,
    /// Membership test for several rows.
    pub has_multiple: String,
    /// Count associated rows.
    pub count: String,
    /// Create and associate a new row.
    pub create: String,
}

impl AccessorNames {
    /// Derives the accessor names for an association alias.
    #[must_use]
    pub fn for_alias(alias: &str) -> Self {
        let singular = singularize(alias);
        Self {
            get: format!("get_{alias}"),
            set: format!("set_{alias}"),
            add: format!("add_{singular}"),
            add_multiple: format!("add_{alias}"),
            remove: format!("remove_{singular}"),
            remove_multiple: format!("remove_{alias}"),
            has: format!("has_{singular}"),
            has_multiple: format!("has_{alias}"),
            count: format!("count_{alias}"),
            create: format!("create_{singular}"),
        }
    }
}

/// A declared one-to-many association.
#[derive(Debug, Clone)]
pub struct HasMany {
    pub(crate) source_table: String,
    pub(crate) target_table: String,
    pub(crate) target_pk: String,
    pub(crate) alias: String,
    pub(crate) foreign_key: String,
    pub(crate) source_key: String,
    pub(crate) accessors: AccessorNames,
    pub(crate) inferred_attribute: Option<InferredAttribute>,
}

impl HasMany {
    /// Returns the source (owning) table name.
    #[must_use]
    pub fn source_table(&self) -> &str {
        &self.source_table
    }

    /// Returns the target (owned) table name.
    #[must_use]
    pub fn target_table(&self) -> &str {
        &self.target_table
    }

    /// Returns the association alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the foreign key column on the target table.
    #[must_use]
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// Returns the source key column the foreign key references.
    #[must_use]
    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    /// Returns the installed accessor names.
    #[must_use]
    pub const fn accessors(&self) -> &AccessorNames {
        &self.accessors
    }

    /// Returns the foreign-key attribute this declaration added to the
    /// target, or `None` when the target already declared the column.
    #[must_use]
    pub const fn inferred_attribute(&self) -> Option<&InferredAttribute> {
        self.inferred_attribute.as_ref()
    }

    /// Binds the association to a source row, using its primary key as the
    /// source key value.
    ///
    /// For declarations with a custom `source_key`, use
    /// [`Self::accessor_for_key`] with that column's value instead.
    pub fn accessor_for<S: Model>(&self, source: &S) -> HasManyAccessor<'_> {
        debug_assert_eq!(S::table_name(), self.source_table);
        self.accessor_for_key(source.pk())
    }

    /// Binds the association to an explicit source key value.
    pub fn accessor_for_key<V: ToSqlValue>(&self, key: V) -> HasManyAccessor<'_> {
        HasManyAccessor {
            assoc: self,
            source_key_value: key.to_sql_value(),
        }
    }
}

/// Row counts from a bulk [`HasManyAccessor::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetChanges {
    /// Rows whose foreign key was cleared.
    pub released: u64,
    /// Rows whose foreign key was claimed.
    pub claimed: u64,
}

/// The relationship operations for one source row.
#[derive(Debug)]
pub struct HasManyAccessor<'a> {
    assoc: &'a HasMany,
    source_key_value: SqlValue,
}

impl HasManyAccessor<'_> {
    /// Returns a lazy query over the associated rows.
    ///
    /// `T` must be the model mapped to the association's target table.
    #[must_use]
    pub fn query<T: Model>(&self) -> Query<T> {
        debug_assert_eq!(T::table_name(), self.assoc.target_table);
        Query::new().filter(Where::eq(
            &self.assoc.foreign_key,
            self.source_key_value.clone(),
        ))
    }

    /// Fetches all associated rows.
    pub async fn find_all<T>(&self, pool: &SqlitePool) -> Result<Vec<T>>
    where
        T: Model + for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Unpin,
    {
        self.query::<T>().find_all(pool).await
    }

    /// Returns the primary keys of the associated rows.
    pub async fn ids(&self, pool: &SqlitePool) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT {pk} FROM {table} WHERE {fk} = ?",
            pk = self.assoc.target_pk,
            table = self.assoc.target_table,
            fk = self.assoc.foreign_key,
        );
        let rows = bind_value_raw(sqlx::query(&sql), self.source_key_value.clone())
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    /// Counts the associated rows.
    pub async fn count(&self, pool: &SqlitePool) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE {fk} = ?",
            table = self.assoc.target_table,
            fk = self.assoc.foreign_key,
        );
        let row = bind_value_raw(sqlx::query(&sql), self.source_key_value.clone())
            .fetch_one(pool)
            .await?;
        Ok(row.get(0))
    }

    /// Returns whether the given row is associated.
    pub async fn has(&self, pool: &SqlitePool, id: i64) -> Result<bool> {
        Ok(self.matching_count(pool, &[id]).await? == 1)
    }

    /// Returns whether every given row is associated.
    pub async fn has_all(&self, pool: &SqlitePool, ids: &[i64]) -> Result<bool> {
        let unique: HashSet<i64> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(true);
        }
        let distinct: Vec<i64> = unique.into_iter().collect();
        let expected = i64::try_from(distinct.len()).unwrap_or(i64::MAX);
        Ok(self.matching_count(pool, &distinct).await? == expected)
    }

    /// Associates the given rows in a single UPDATE.
    pub async fn add(&self, pool: &SqlitePool, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut collector = BindCollector::new(BindStyle::Positional);
        let fk_marker = collector.push(self.source_key_value.clone());
        let id_markers: Vec<String> = ids.iter().map(|id| collector.push(*id)).collect();
        let sql = format!(
            "UPDATE {table} SET {fk} = {fk_marker} WHERE {pk} IN ({ids})",
            table = self.assoc.target_table,
            fk = self.assoc.foreign_key,
            pk = self.assoc.target_pk,
            ids = id_markers.join(", "),
        );
        self.execute(pool, &sql, collector.into_values()).await
    }

    /// Disassociates the given rows in a single UPDATE.
    ///
    /// Only rows currently associated with this source are touched.
    pub async fn remove(&self, pool: &SqlitePool, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut collector = BindCollector::new(BindStyle::Positional);
        let fk_marker = collector.push(self.source_key_value.clone());
        let id_markers: Vec<String> = ids.iter().map(|id| collector.push(*id)).collect();
        let sql = format!(
            "UPDATE {table} SET {fk} = NULL WHERE {fk} = {fk_marker} AND {pk} IN ({ids})",
            table = self.assoc.target_table,
            fk = self.assoc.foreign_key,
            pk = self.assoc.target_pk,
            ids = id_markers.join(", "),
        );
        self.execute(pool, &sql, collector.into_values()).await
    }

    /// Replaces the associated set with exactly the given rows.
    ///
    /// Diffs the current membership against the desired one and issues at
    /// most two UPDATEs: one releasing rows no longer wanted, one claiming
    /// newly wanted rows. Rows already in the desired state are not
    /// rewritten.
    pub async fn set(&self, pool: &SqlitePool, ids: &[i64]) -> Result<SetChanges> {
        let current: HashSet<i64> = self.ids(pool).await?.into_iter().collect();
        let desired: HashSet<i64> = ids.iter().copied().collect();

        let to_release: Vec<i64> = current.difference(&desired).copied().collect();
        let to_claim: Vec<i64> = desired.difference(&current).copied().collect();

        let mut changes = SetChanges::default();
        if !to_release.is_empty() {
            changes.released = self.remove(pool, &to_release).await?;
        }
        if !to_claim.is_empty() {
            changes.claimed = self.add(pool, &to_claim).await?;
        }

        debug!(
            table = %self.assoc.target_table,
            alias = %self.assoc.alias,
            released = changes.released,
            claimed = changes.claimed,
            "hasMany set"
        );
        Ok(changes)
    }

    /// Inserts a new target row with the foreign key pre-set to this
    /// source, returning the new rowid.
    ///
    /// A foreign-key entry in `values` is ignored; the association owns
    /// that column.
    pub async fn create(&self, pool: &SqlitePool, values: &[(&str, SqlValue)]) -> Result<i64> {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let mut columns = Vec::with_capacity(values.len() + 1);
        let mut markers = Vec::with_capacity(values.len() + 1);

        for (column, value) in values {
            if *column == self.assoc.foreign_key {
                continue;
            }
            columns.push(*column);
            markers.push(collector.push(value.clone()));
        }
        columns.push(self.assoc.foreign_key.as_str());
        markers.push(collector.push(self.source_key_value.clone()));

        let sql = format!(
            "INSERT INTO {table} ({columns}) VALUES ({markers})",
            table = self.assoc.target_table,
            columns = columns.join(", "),
            markers = markers.join(", "),
        );
        let mut query = sqlx::query(&sql);
        for param in collector.into_values() {
            query = bind_value_raw(query, param);
        }
        let result = query.execute(pool).await?;
        Ok(result.last_insert_rowid())
    }

    async fn matching_count(&self, pool: &SqlitePool, ids: &[i64]) -> Result<i64> {
        let mut collector = BindCollector::new(BindStyle::Positional);
        let fk_marker = collector.push(self.source_key_value.clone());
        let id_markers: Vec<String> = ids.iter().map(|id| collector.push(*id)).collect();
        let sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE {fk} = {fk_marker} AND {pk} IN ({ids})",
            table = self.assoc.target_table,
            fk = self.assoc.foreign_key,
            pk = self.assoc.target_pk,
            ids = id_markers.join(", "),
        );
        let mut query = sqlx::query(&sql);
        for param in collector.into_values() {
            query = bind_value_raw(query, param);
        }
        let row = query.fetch_one(pool).await?;
        Ok(row.get(0))
    }

    async fn execute(
        &self,
        pool: &SqlitePool,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> Result<u64> {
        let mut query = sqlx::query(sql);
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

    #[test]
    fn accessor_names_pluralize_the_alias() {
        let names = AccessorNames::for_alias("tasks");
        assert_eq!(names.get, "get_tasks");
        assert_eq!(names.set, "set_tasks");
        assert_eq!(names.add, "add_task");
        assert_eq!(names.add_multiple, "add_tasks");
        assert_eq!(names.remove, "remove_task");
        assert_eq!(names.remove_multiple, "remove_tasks");
        assert_eq!(names.has, "has_task");
        assert_eq!(names.has_multiple, "has_tasks");
        assert_eq!(names.count, "count_tasks");
        assert_eq!(names.create, "create_task");
    }

    #[test]
    fn accessor_names_handle_ies_plurals() {
        let names = AccessorNames::for_alias("stories");
        assert_eq!(names.add, "add_story");
        assert_eq!(names.create, "create_story");
        assert_eq!(names.get, "get_stories");
    }
}
