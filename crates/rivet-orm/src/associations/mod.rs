//! Relationship declarations between models.
//!
//! Declaring `users hasMany tasks` records metadata (foreign key, source
//! key, alias, accessor names) in an [`AssociationRegistry`]; the metadata
//! then drives the relationship operations on [`HasManyAccessor`]. Nothing
//! here touches the database at declaration time.
//!
//! # Example
//!
//! ```ignore
//! let registry = AssociationRegistry::new();
//! let assoc = registry.has_many::<User, Task>(HasManyOptions::new())?;
//!
//! // Foreign key inferred from the source table and primary key:
//! assert_eq!(assoc.foreign_key(), "user_id");
//!
//! // The accessor carries the relationship operations for one row:
//! let tasks = assoc.accessor_for(&user).find_all::<Task>(&pool).await?;
//! ```

mod has_many;
mod hooks;

pub use has_many::{AccessorNames, HasMany, HasManyAccessor, SetChanges};
pub use hooks::{AssociationEvent, AssociationHook};

use std::collections::HashMap;
use std::sync::RwLock;

use rivet_sql_core::schema::DataType;
use tracing::debug;

use crate::error::{OrmError, Result};
use crate::model::Model;

use hooks::HookSet;

/// A foreign-key attribute a declaration added to its target model.
///
/// Recorded when the target table does not already declare the foreign key
/// column, so schema tooling can create it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredAttribute {
    /// Column name on the target table.
    pub column: String,
    /// Column type.
    pub data_type: DataType,
    /// Foreign keys are nullable so rows can be disassociated.
    pub nullable: bool,
    /// The table the column references.
    pub references_table: String,
    /// The column it references.
    pub references_column: String,
}

/// Options for a hasMany declaration.
///
/// # Example
///
/// ```ignore
/// let options = HasManyOptions::new()
///     .alias("chores")
///     .foreign_key("owner_id");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HasManyOptions {
    alias: Option<String>,
    foreign_key: Option<String>,
    source_key: Option<String>,
    skip_hooks: bool,
}

impl HasManyOptions {
    /// Creates options with every value inferred.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the association; defaults to the target table name.
    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Overrides the foreign key column on the target.
    #[must_use]
    pub fn foreign_key(mut self, column: &str) -> Self {
        self.foreign_key = Some(column.to_string());
        self
    }

    /// Uses a source column other than the primary key.
    #[must_use]
    pub fn source_key(mut self, column: &str) -> Self {
        self.source_key = Some(column.to_string());
        self
    }

    /// Declares without firing association hooks.
    #[must_use]
    pub const fn skip_hooks(mut self) -> Self {
        self.skip_hooks = true;
        self
    }
}

/// Registry of declared associations, keyed by source table and alias.
#[derive(Debug, Default)]
pub struct AssociationRegistry {
    associations: RwLock<HashMap<(String, String), HasMany>>,
    hooks: RwLock<HookSet>,
}

impl AssociationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook fired before each declaration is recorded.
    pub fn before_associate<F>(&self, hook: F)
    where
        F: Fn(&AssociationEvent) + Send + Sync + 'static,
    {
        if let Ok(mut hooks) = self.hooks.write() {
            hooks.add_before(Box::new(hook));
        }
    }

    /// Registers a hook fired after each declaration is recorded.
    pub fn after_associate<F>(&self, hook: F)
    where
        F: Fn(&AssociationEvent) + Send + Sync + 'static,
    {
        if let Ok(mut hooks) = self.hooks.write() {
            hooks.add_after(Box::new(hook));
        }
    }

    /// Declares a one-to-many association from `S` to `T`.
    ///
    /// The foreign key defaults to `<singular source table>_<source key>`
    /// (`users`.`id` -> `user_id`); the source key defaults to the source
    /// primary key; the alias defaults to the target table name.
    ///
    /// # Errors
    ///
    /// - [`OrmError::AliasInUse`] when the source already declared the alias
    /// - [`OrmError::SelfReferenceWithoutAlias`] for unaliased
    ///   self-associations
    /// - [`OrmError::InvalidAssociation`] for empty alias, key, or a source
    ///   key the source table does not declare
    pub fn has_many<S: Model, T: Model>(&self, options: HasManyOptions) -> Result<HasMany> {
        let source_table = S::table_name();
        let target_table = T::table_name();

        if source_table == target_table && options.alias.is_none() {
            return Err(OrmError::SelfReferenceWithoutAlias {
                table: source_table.to_string(),
            });
        }

        let alias = options
            .alias
            .unwrap_or_else(|| target_table.to_string());
        if alias.is_empty() {
            return Err(OrmError::InvalidAssociation(String::from(
                "association alias must not be empty",
            )));
        }

        let source_key = options
            .source_key
            .unwrap_or_else(|| S::pk_column().to_string());
        if !S::columns().contains(&source_key.as_str()) {
            return Err(OrmError::InvalidAssociation(format!(
                "source key {source_key:?} is not a column of {source_table}"
            )));
        }

        let foreign_key = match options.foreign_key {
            Some(column) => {
                if column.is_empty() {
                    return Err(OrmError::InvalidAssociation(String::from(
                        "foreign key override must not be empty",
                    )));
                }
                column
            }
            None => format!("{}_{}", singularize(source_table), source_key),
        };

        // Record the attribute the declaration adds to the target.
        let inferred_attribute = if T::columns().contains(&foreign_key.as_str()) {
            None
        } else {
            Some(InferredAttribute {
                column: foreign_key.clone(),
                data_type: DataType::Bigint,
                nullable: true,
                references_table: source_table.to_string(),
                references_column: source_key.clone(),
            })
        };

        let event = AssociationEvent {
            source_table: source_table.to_string(),
            target_table: target_table.to_string(),
            alias: alias.clone(),
            foreign_key: foreign_key.clone(),
        };

        let key = (source_table.to_string(), alias.clone());
        if let Ok(map) = self.associations.read() {
            if map.contains_key(&key) {
                return Err(OrmError::AliasInUse {
                    source: source_table.to_string(),
                    alias,
                });
            }
        }

        if !options.skip_hooks {
            if let Ok(hooks) = self.hooks.read() {
                hooks.fire_before(&event);
            }
        }

        let association = HasMany {
            source_table: source_table.to_string(),
            target_table: target_table.to_string(),
            target_pk: T::pk_column().to_string(),
            alias: alias.clone(),
            foreign_key,
            source_key,
            accessors: AccessorNames::for_alias(&alias),
            inferred_attribute,
        };

        {
            let mut map = self
                .associations
                .write()
                .map_err(|_| OrmError::InvalidAssociation(String::from("registry poisoned")))?;
            if map.contains_key(&key) {
                return Err(OrmError::AliasInUse {
                    source: source_table.to_string(),
                    alias,
                });
            }
            map.insert(key, association.clone());
        }

        debug!(
            source = source_table,
            target = target_table,
            alias = %association.alias,
            foreign_key = %association.foreign_key,
            "hasMany declared"
        );

        if !options.skip_hooks {
            if let Ok(hooks) = self.hooks.read() {
                hooks.fire_after(&event);
            }
        }

        Ok(association)
    }

    /// Looks up a declared association by source table and alias.
    #[must_use]
    pub fn get(&self, source_table: &str, alias: &str) -> Option<HasMany> {
        self.associations
            .read()
            .ok()?
            .get(&(source_table.to_string(), alias.to_string()))
            .cloned()
    }

    /// Returns every association declared by a source table.
    #[must_use]
    pub fn associations_for(&self, source_table: &str) -> Vec<HasMany> {
        self.associations.read().map_or_else(
            |_| Vec::new(),
            |map| {
                map.iter()
                    .filter(|((source, _), _)| source.as_str() == source_table)
                    .map(|(_, assoc)| assoc.clone())
                    .collect()
            },
        )
    }
}

/// Strips a plural table name down to its singular form for key inference.
///
/// Covers the regular English plurals table names use in practice;
/// irregular names can always pass an explicit `foreign_key`.
pub(crate) fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if name.ends_with("ses") || name.ends_with("xes") || name.ends_with("zes") {
        return name[..name.len() - 2].to_string();
    }
    if let Some(stem) = name.strip_suffix('s') {
        if !stem.ends_with('s') {
            return stem.to_string();
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singularize_regular_plurals() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("tasks"), "task");
        assert_eq!(singularize("stories"), "story");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("boxes"), "box");
    }

    #[test]
    fn singularize_leaves_non_plurals_alone() {
        assert_eq!(singularize("staff"), "staff");
        assert_eq!(singularize("address"), "address");
    }
}
