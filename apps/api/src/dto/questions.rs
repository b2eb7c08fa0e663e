use std::collections::BTreeMap;

use forum_application::{QuestionCapabilities, QuestionListQuery, QuestionView};
use forum_core::{AppError, AppResult};
use forum_domain::{FieldAccess, FieldSet, QuestionChanges, QuestionDraft, UserId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

const MAX_PAGE_SIZE: usize = 200;

/// Per-field access classification sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/field-access-response.ts"
)]
pub enum FieldAccessResponse {
    Editable,
    ReadOnly,
    Hidden,
}

impl From<FieldAccess> for FieldAccessResponse {
    fn from(value: FieldAccess) -> Self {
        match value {
            FieldAccess::Editable => Self::Editable,
            FieldAccess::ReadOnly => Self::ReadOnly,
            FieldAccess::Hidden => Self::Hidden,
        }
    }
}

/// API representation of a question, redacted for the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/question-response.ts"
)]
pub struct QuestionResponse {
    pub id: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub creator: Option<String>,
    pub is_published: Option<bool>,
    pub field_access: BTreeMap<String, FieldAccessResponse>,
}

impl From<QuestionView> for QuestionResponse {
    fn from(value: QuestionView) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            body: value.body,
            creator: value.creator.map(|creator| creator.to_string()),
            is_published: value.is_published,
            field_access: value
                .field_access
                .into_iter()
                .map(|(field, access)| (field, access.into()))
                .collect(),
        }
    }
}

/// Paging query for question listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuestionsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TryFrom<ListQuestionsQuery> for QuestionListQuery {
    type Error = AppError;

    fn try_from(value: ListQuestionsQuery) -> AppResult<Self> {
        let defaults = QuestionListQuery::default();
        let limit = value.limit.unwrap_or(defaults.limit);
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self {
            limit,
            offset: value.offset.unwrap_or(defaults.offset),
        })
    }
}

/// Incoming payload for question creation.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-question-request.ts"
)]
pub struct CreateQuestionRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub is_published: Option<bool>,
}

impl From<CreateQuestionRequest> for QuestionDraft {
    fn from(value: CreateQuestionRequest) -> Self {
        Self {
            title: value.title,
            body: value.body,
            is_published: value.is_published,
        }
    }
}

/// Incoming payload for question changes. Omitted fields stay untouched.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-question-request.ts"
)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub creator: Option<String>,
    pub is_published: Option<bool>,
}

impl TryFrom<UpdateQuestionRequest> for QuestionChanges {
    type Error = AppError;

    fn try_from(value: UpdateQuestionRequest) -> AppResult<Self> {
        let creator = value
            .creator
            .map(|creator| {
                Uuid::parse_str(creator.as_str())
                    .map(UserId::from_uuid)
                    .map_err(|error| {
                        AppError::Validation(format!("invalid creator '{creator}': {error}"))
                    })
            })
            .transpose()?;

        Ok(Self {
            title: value.title,
            body: value.body,
            creator,
            is_published: value.is_published,
        })
    }
}

/// Table-wide capabilities of the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/question-capabilities-response.ts"
)]
pub struct QuestionCapabilitiesResponse {
    pub can_add: bool,
    pub can_view_all: bool,
    pub can_change_all: bool,
    pub can_delete_all: bool,
    pub has_some_permissions: bool,
}

impl From<QuestionCapabilities> for QuestionCapabilitiesResponse {
    fn from(value: QuestionCapabilities) -> Self {
        Self {
            can_add: value.can_add,
            can_view_all: value.can_view_all,
            can_change_all: value.can_change_all,
            can_delete_all: value.can_delete_all,
            has_some_permissions: value.has_some_permissions,
        }
    }
}

/// Fields offered by the add form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/add-form-response.ts"
)]
pub struct AddFormResponse {
    pub fields: Vec<String>,
}

impl From<FieldSet> for AddFormResponse {
    fn from(value: FieldSet) -> Self {
        Self {
            fields: value.to_names(),
        }
    }
}
