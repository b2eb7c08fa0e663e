//! Domain entities, invariants and the confidential access policy.

#![forbid(unsafe_code)]

mod actor;
mod policy;
mod question;
mod question_policy;
mod row_filter;
mod schema;
mod security;
mod user;

pub use actor::{AccessTier, Actor, RoleTier};
pub use policy::{ConfidentialPolicy, EntityRules, FieldAccess};
pub use question::{
    QUESTION_SCHEMA, QUESTION_TITLE_MAX_LENGTH, Question, QuestionChanges, QuestionDraft,
    QuestionId,
};
pub use question_policy::{QuestionPolicy, QuestionRules};
pub use row_filter::RowFilter;
pub use schema::{ConfidentialRecord, EntitySchema, FieldSet, FieldValue};
pub use security::{Action, Permission};
pub use user::{AccountRole, USERNAME_MAX_LENGTH, UserAccount, UserId, Username};
