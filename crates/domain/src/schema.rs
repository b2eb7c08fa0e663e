//! Declared entity schemas and the field sets checked against them.

use std::collections::BTreeSet;

use forum_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Field layout of a confidential entity, declared once per entity type.
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
    entity: &'static str,
    fields: &'static [&'static str],
    ownership_field: &'static str,
    publication_field: Option<&'static str>,
}

impl EntitySchema {
    /// Declares a schema. Use [`EntitySchema::validate`] in tests to check it.
    #[must_use]
    pub const fn new(
        entity: &'static str,
        fields: &'static [&'static str],
        ownership_field: &'static str,
        publication_field: Option<&'static str>,
    ) -> Self {
        Self {
            entity,
            fields,
            ownership_field,
            publication_field,
        }
    }

    /// Returns the entity type name used in permission codenames.
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Returns the declared field names in declaration order.
    #[must_use]
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    /// Returns the field linking a row to its creator.
    #[must_use]
    pub fn ownership_field(&self) -> &'static str {
        self.ownership_field
    }

    /// Returns the boolean field marking a row as public, if the entity has one.
    #[must_use]
    pub fn publication_field(&self) -> Option<&'static str> {
        self.publication_field
    }

    /// Checks that the schema is internally consistent.
    pub fn validate(&self) -> AppResult<()> {
        let unique: BTreeSet<&str> = self.fields.iter().copied().collect();
        if unique.len() != self.fields.len() {
            return Err(AppError::Validation(format!(
                "entity '{}' declares a field twice",
                self.entity
            )));
        }

        self.field(self.ownership_field)?;
        if let Some(publication_field) = self.publication_field {
            self.field(publication_field)?;
        }

        Ok(())
    }

    /// Resolves a field name to its declared form, failing for unknown names.
    pub fn field(&self, name: &str) -> AppResult<&'static str> {
        self.fields
            .iter()
            .copied()
            .find(|declared| *declared == name)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "field '{name}' is not declared on entity '{}'",
                    self.entity
                ))
            })
    }

    /// Builds a field set, failing if any name is not declared.
    pub fn field_set<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> AppResult<FieldSet> {
        let fields = names
            .into_iter()
            .map(|name| self.field(name))
            .collect::<AppResult<BTreeSet<_>>>()?;

        Ok(FieldSet {
            entity: self.entity,
            fields,
        })
    }

    /// Returns every declared field.
    #[must_use]
    pub fn all_fields(&self) -> FieldSet {
        FieldSet {
            entity: self.entity,
            fields: self.fields.iter().copied().collect(),
        }
    }

    /// Returns the empty field set for this entity.
    #[must_use]
    pub fn no_fields(&self) -> FieldSet {
        FieldSet {
            entity: self.entity,
            fields: BTreeSet::new(),
        }
    }
}

/// Set of declared field names of one entity.
///
/// Only an [`EntitySchema`] can build one, so a set never holds an unknown name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    entity: &'static str,
    fields: BTreeSet<&'static str>,
}

impl FieldSet {
    /// Returns the entity the fields belong to.
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Returns whether the field is in the set.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates field names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().copied()
    }

    /// Returns whether every field of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &FieldSet) -> bool {
        self.entity == other.entity && self.fields.is_subset(&other.fields)
    }

    /// Returns the union with another set of the same entity.
    pub fn union(mut self, other: FieldSet) -> AppResult<FieldSet> {
        if self.entity != other.entity {
            return Err(AppError::Validation(format!(
                "cannot combine fields of entity '{}' with fields of entity '{}'",
                self.entity, other.entity
            )));
        }

        self.fields.extend(other.fields);
        Ok(self)
    }

    /// Returns the names as owned strings.
    #[must_use]
    pub fn to_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| (*field).to_owned()).collect()
    }
}

/// Field value compared by row filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Boolean column.
    Bool(bool),
    /// Reference to a user row.
    User(UserId),
    /// Text column.
    Text(String),
}

/// A stored row of a confidential entity.
pub trait ConfidentialRecord {
    /// Returns the schema shared by every row of this type.
    fn schema() -> &'static EntitySchema;

    /// Returns the value of a declared field, or `None` for unknown names.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Returns the creator referenced by the ownership field.
    fn owner(&self) -> Option<UserId> {
        match self.field_value(Self::schema().ownership_field()) {
            Some(FieldValue::User(user_id)) => Some(user_id),
            _ => None,
        }
    }
}
