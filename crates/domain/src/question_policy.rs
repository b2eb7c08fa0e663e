//! Access rules for [`Question`] rows.

use forum_core::AppResult;

use crate::actor::{Actor, RoleTier};
use crate::policy::{ConfidentialPolicy, EntityRules};
use crate::row_filter::RowFilter;
use crate::schema::{ConfidentialRecord, FieldSet, FieldValue};
use crate::question::{QUESTION_SCHEMA, Question};
use crate::security::Action;

/// Confidential policy configured for questions.
pub type QuestionPolicy = ConfidentialPolicy<QuestionRules>;

/// Question-specific extensions to the generic policy.
///
/// - any signed-in user may add questions;
/// - published questions are public, members also see their own drafts,
///   staff see everything;
/// - staff may change every question, members only their own;
/// - the creator may edit the body, staff may toggle publication.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionRules;

impl QuestionRules {
    fn published_rows() -> AppResult<RowFilter> {
        match QUESTION_SCHEMA.publication_field() {
            Some(field) => RowFilter::field_equals(&QUESTION_SCHEMA, field, FieldValue::Bool(true)),
            None => Ok(RowFilter::Nothing),
        }
    }

    fn own_rows(actor: &Actor) -> AppResult<RowFilter> {
        match actor.user_id() {
            Some(user_id) => RowFilter::field_equals(
                &QUESTION_SCHEMA,
                QUESTION_SCHEMA.ownership_field(),
                FieldValue::User(user_id),
            ),
            None => Ok(RowFilter::Nothing),
        }
    }

    fn public_fields() -> AppResult<FieldSet> {
        QUESTION_SCHEMA.field_set([Question::TITLE, Question::BODY, Question::CREATOR])
    }
}

impl EntityRules for QuestionRules {
    type Record = Question;

    fn grants_table_wide(&self, action: Action, actor: &Actor) -> bool {
        action == Action::Add && actor.is_authenticated()
    }

    fn extra_rows(&self, action: Action, actor: &Actor) -> AppResult<RowFilter> {
        match (action, actor.tier()) {
            (Action::View | Action::Change, RoleTier::Staff | RoleTier::Superuser) => {
                Ok(RowFilter::Everything)
            }
            (Action::View, RoleTier::Authenticated) => {
                Ok(Self::published_rows()? | Self::own_rows(actor)?)
            }
            (Action::View, RoleTier::Anonymous) => Self::published_rows(),
            (Action::Change, RoleTier::Authenticated) => Self::own_rows(actor),
            (Action::Change, RoleTier::Anonymous) | (Action::Add | Action::Delete, _) => {
                Ok(RowFilter::Nothing)
            }
        }
    }

    fn extra_viewable_fields(&self, actor: &Actor, record: &Question) -> AppResult<FieldSet> {
        if actor.is_staff() || record.owner().is_some_and(|owner| actor.is_user(owner)) {
            return Ok(QUESTION_SCHEMA.all_fields());
        }

        Self::public_fields()
    }

    fn extra_changeable_fields(&self, actor: &Actor, record: &Question) -> AppResult<FieldSet> {
        let mut fields = QUESTION_SCHEMA.no_fields();

        if record.owner().is_some_and(|owner| actor.is_user(owner)) {
            fields = fields.union(QUESTION_SCHEMA.field_set([Question::BODY])?)?;
        }
        if actor.is_staff() {
            fields = fields.union(QUESTION_SCHEMA.field_set([Question::IS_PUBLISHED])?)?;
        }

        Ok(fields)
    }

    fn addable_fields(&self, actor: &Actor) -> AppResult<FieldSet> {
        if actor.is_staff() {
            return QUESTION_SCHEMA.field_set([
                Question::TITLE,
                Question::BODY,
                Question::IS_PUBLISHED,
            ]);
        }

        QUESTION_SCHEMA.field_set([Question::TITLE, Question::BODY])
    }
}
