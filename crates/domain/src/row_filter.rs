//! Composable row predicates standing in for query-set algebra.

use std::ops::{BitAnd, BitOr};

use forum_core::{AppError, AppResult};

use crate::schema::{ConfidentialRecord, EntitySchema, FieldValue};

/// Predicate selecting a subset of an entity's rows.
///
/// Evaluated in memory with [`RowFilter::matches`]; storage adapters may
/// translate it into their own query language instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// Every row.
    Everything,
    /// No row.
    Nothing,
    /// Rows whose field equals the value.
    Equals {
        /// Declared field name.
        field: &'static str,
        /// Value to compare with.
        value: FieldValue,
    },
    /// Rows matching at least one filter.
    AnyOf(Vec<RowFilter>),
    /// Rows matching every filter.
    AllOf(Vec<RowFilter>),
}

impl RowFilter {
    /// Builds an equality filter on a declared field.
    pub fn field_equals(
        schema: &EntitySchema,
        field: &str,
        value: FieldValue,
    ) -> AppResult<Self> {
        Ok(Self::Equals {
            field: schema.field(field)?,
            value,
        })
    }

    /// Returns whether the filter selects no row regardless of data.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        match self {
            Self::Nothing => true,
            Self::Everything | Self::Equals { .. } => false,
            Self::AnyOf(filters) => filters.iter().all(Self::is_nothing),
            Self::AllOf(filters) => filters.iter().any(Self::is_nothing),
        }
    }

    /// Returns whether the filter selects every row regardless of data.
    #[must_use]
    pub fn is_everything(&self) -> bool {
        match self {
            Self::Everything => true,
            Self::Nothing | Self::Equals { .. } => false,
            Self::AnyOf(filters) => filters.iter().any(Self::is_everything),
            Self::AllOf(filters) => filters.iter().all(Self::is_everything),
        }
    }

    /// Returns the set union, collapsing trivial operands.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_everything() || other.is_everything() {
            return Self::Everything;
        }
        if self.is_nothing() {
            return other;
        }
        if other.is_nothing() {
            return self;
        }

        let mut filters = Vec::new();
        for filter in [self, other] {
            match filter {
                Self::AnyOf(nested) => filters.extend(nested),
                filter => filters.push(filter),
            }
        }
        Self::AnyOf(filters)
    }

    /// Returns the set intersection, collapsing trivial operands.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        if self.is_nothing() || other.is_nothing() {
            return Self::Nothing;
        }
        if self.is_everything() {
            return other;
        }
        if other.is_everything() {
            return self;
        }

        let mut filters = Vec::new();
        for filter in [self, other] {
            match filter {
                Self::AllOf(nested) => filters.extend(nested),
                filter => filters.push(filter),
            }
        }
        Self::AllOf(filters)
    }

    /// Returns whether the record is in the selected set.
    ///
    /// Fails when the filter references a field the record does not expose.
    pub fn matches<R: ConfidentialRecord>(&self, record: &R) -> AppResult<bool> {
        match self {
            Self::Everything => Ok(true),
            Self::Nothing => Ok(false),
            Self::Equals { field, value } => {
                let actual = record.field_value(field).ok_or_else(|| {
                    AppError::Validation(format!(
                        "row of entity '{}' has no field '{field}'",
                        R::schema().entity()
                    ))
                })?;
                Ok(&actual == value)
            }
            Self::AnyOf(filters) => {
                for filter in filters {
                    if filter.matches(record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::AllOf(filters) => {
                for filter in filters {
                    if !filter.matches(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

impl BitOr for RowFilter {
    type Output = RowFilter;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd for RowFilter {
    type Output = RowFilter;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersect(rhs)
    }
}
