//! Generic confidential access policy: table-wide, row-level and field-level.
//!
//! [`ConfidentialPolicy`] always evaluates in the same order: the generic
//! table-wide term first, then the entity's [`EntityRules`]. Entity rules can
//! only add rows and fields to what the generic term grants.

use std::collections::BTreeMap;

use forum_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::actor::{AccessTier, Actor};
use crate::row_filter::RowFilter;
use crate::schema::{ConfidentialRecord, EntitySchema, FieldSet};
use crate::security::Action;

/// How one field of a row is presented to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAccess {
    /// Rendered as an input.
    Editable,
    /// Rendered as a read-only value.
    ReadOnly,
    /// Not rendered.
    Hidden,
}

/// Entity-specific extensions layered over the generic policy.
///
/// Every hook defaults to granting nothing extra.
pub trait EntityRules: Send + Sync {
    /// Row type governed by these rules.
    type Record: ConfidentialRecord;

    /// Grants a table-wide permission beyond superuser and explicit grants.
    fn grants_table_wide(&self, _action: Action, _actor: &Actor) -> bool {
        false
    }

    /// Extra rows for `action` beyond the table-wide term.
    fn extra_rows(&self, _action: Action, _actor: &Actor) -> AppResult<RowFilter> {
        Ok(RowFilter::Nothing)
    }

    /// Extra viewable fields for an actor without table-wide view permission.
    fn extra_viewable_fields(&self, _actor: &Actor, _record: &Self::Record) -> AppResult<FieldSet> {
        Ok(<Self::Record as ConfidentialRecord>::schema().no_fields())
    }

    /// Extra changeable fields for an actor without table-wide change permission.
    fn extra_changeable_fields(
        &self,
        _actor: &Actor,
        _record: &Self::Record,
    ) -> AppResult<FieldSet> {
        Ok(<Self::Record as ConfidentialRecord>::schema().no_fields())
    }

    /// Fields an actor already allowed to add may set on a new row.
    ///
    /// Defaults to every field except the ownership field, which is stamped
    /// from the actor.
    fn addable_fields(&self, _actor: &Actor) -> AppResult<FieldSet> {
        let schema = <Self::Record as ConfidentialRecord>::schema();
        schema.field_set(
            schema
                .fields()
                .iter()
                .copied()
                .filter(|field| *field != schema.ownership_field()),
        )
    }
}

/// Confidential access policy for one entity type.
#[derive(Debug, Clone, Default)]
pub struct ConfidentialPolicy<R> {
    rules: R,
}

impl<R: EntityRules> ConfidentialPolicy<R> {
    /// Wraps entity rules in the generic policy.
    #[must_use]
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    /// Returns the governed schema.
    #[must_use]
    pub fn schema(&self) -> &'static EntitySchema {
        <R::Record as ConfidentialRecord>::schema()
    }

    /// Returns the wrapped entity rules.
    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Returns whether the actor may perform `action` on any row of the table.
    #[must_use]
    pub fn has_table_wide_permission(&self, actor: &Actor, action: Action) -> bool {
        match actor.access_tier(action, self.schema().entity()) {
            AccessTier::Superuser | AccessTier::TableWide => true,
            AccessTier::Staff(_) | AccessTier::Authenticated(_) | AccessTier::Anonymous => {
                self.rules.grants_table_wide(action, actor)
            }
        }
    }

    /// Returns whether the actor may add rows.
    #[must_use]
    pub fn has_table_wide_add_permission(&self, actor: &Actor) -> bool {
        self.has_table_wide_permission(actor, Action::Add)
    }

    /// Returns whether the actor may view every row.
    #[must_use]
    pub fn has_table_wide_view_permission(&self, actor: &Actor) -> bool {
        self.has_table_wide_permission(actor, Action::View)
    }

    /// Returns whether the actor may change every row.
    #[must_use]
    pub fn has_table_wide_change_permission(&self, actor: &Actor) -> bool {
        self.has_table_wide_permission(actor, Action::Change)
    }

    /// Returns whether the actor may delete every row.
    #[must_use]
    pub fn has_table_wide_delete_permission(&self, actor: &Actor) -> bool {
        self.has_table_wide_permission(actor, Action::Delete)
    }

    /// Returns whether the entity should be offered to the actor at all.
    pub fn has_some_permissions(&self, actor: &Actor) -> AppResult<bool> {
        if Action::all()
            .iter()
            .any(|action| self.has_table_wide_permission(actor, *action))
        {
            return Ok(true);
        }

        for action in [Action::View, Action::Change, Action::Delete] {
            if !self.rules.extra_rows(action, actor)?.is_nothing() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Returns the rows the actor may act on with `action`.
    pub fn rows_with_permission(&self, actor: &Actor, action: Action) -> AppResult<RowFilter> {
        let table_wide = if self.has_table_wide_permission(actor, action) {
            RowFilter::Everything
        } else {
            RowFilter::Nothing
        };

        if table_wide.is_everything() {
            return Ok(table_wide);
        }

        Ok(table_wide | self.rules.extra_rows(action, actor)?)
    }

    /// Returns the rows the actor may view.
    pub fn rows_with_view_permission(&self, actor: &Actor) -> AppResult<RowFilter> {
        self.rows_with_permission(actor, Action::View)
    }

    /// Returns the rows the actor may change.
    pub fn rows_with_change_permission(&self, actor: &Actor) -> AppResult<RowFilter> {
        self.rows_with_permission(actor, Action::Change)
    }

    /// Returns the rows the actor may delete.
    pub fn rows_with_delete_permission(&self, actor: &Actor) -> AppResult<RowFilter> {
        self.rows_with_permission(actor, Action::Delete)
    }

    /// Returns whether the actor may act on this row with `action`.
    pub fn permits_row(&self, actor: &Actor, action: Action, record: &R::Record) -> AppResult<bool> {
        self.rows_with_permission(actor, action)?.matches(record)
    }

    /// Returns the fields of `record` the actor may see.
    ///
    /// Empty whenever the row itself is outside the actor's view rows.
    pub fn viewable_fields(&self, actor: &Actor, record: &R::Record) -> AppResult<FieldSet> {
        if !self.permits_row(actor, Action::View, record)? {
            return Ok(self.schema().no_fields());
        }

        match actor.access_tier(Action::View, self.schema().entity()) {
            AccessTier::Superuser | AccessTier::TableWide => Ok(self.schema().all_fields()),
            _ => self.rules.extra_viewable_fields(actor, record),
        }
    }

    /// Returns the fields of `record` the actor may modify.
    ///
    /// Empty whenever the row itself is outside the actor's change rows.
    pub fn changeable_fields(&self, actor: &Actor, record: &R::Record) -> AppResult<FieldSet> {
        if !self.permits_row(actor, Action::Change, record)? {
            return Ok(self.schema().no_fields());
        }

        match actor.access_tier(Action::Change, self.schema().entity()) {
            AccessTier::Superuser | AccessTier::TableWide => Ok(self.schema().all_fields()),
            _ => self.rules.extra_changeable_fields(actor, record),
        }
    }

    /// Returns the fields the actor may set when adding a row.
    ///
    /// Empty when the actor may not add rows.
    pub fn addable_fields(&self, actor: &Actor) -> AppResult<FieldSet> {
        if !self.has_table_wide_add_permission(actor) {
            return Ok(self.schema().no_fields());
        }

        let fields = self.rules.addable_fields(actor)?;
        if fields.entity() != self.schema().entity() {
            return Err(AppError::Internal(format!(
                "addable fields for entity '{}' were declared against entity '{}'",
                self.schema().entity(),
                fields.entity()
            )));
        }

        Ok(fields)
    }

    /// Returns whether the actor may see one field, failing for undeclared names.
    pub fn can_view_field(&self, actor: &Actor, record: &R::Record, field: &str) -> AppResult<bool> {
        let field = self.schema().field(field)?;
        Ok(self.viewable_fields(actor, record)?.contains(field))
    }

    /// Returns whether the actor may modify one field, failing for undeclared names.
    pub fn can_change_field(
        &self,
        actor: &Actor,
        record: &R::Record,
        field: &str,
    ) -> AppResult<bool> {
        let field = self.schema().field(field)?;
        Ok(self.changeable_fields(actor, record)?.contains(field))
    }

    /// Classifies every declared field of `record` for the actor.
    ///
    /// A field is only editable when it is also viewable.
    pub fn field_access(
        &self,
        actor: &Actor,
        record: &R::Record,
    ) -> AppResult<BTreeMap<&'static str, FieldAccess>> {
        let viewable = self.viewable_fields(actor, record)?;
        let changeable = self.changeable_fields(actor, record)?;

        Ok(self
            .schema()
            .fields()
            .iter()
            .map(|field| {
                let access = match (viewable.contains(field), changeable.contains(field)) {
                    (true, true) => FieldAccess::Editable,
                    (true, false) => FieldAccess::ReadOnly,
                    (false, _) => FieldAccess::Hidden,
                };
                (*field, access)
            })
            .collect())
    }
}
