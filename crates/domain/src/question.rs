//! The forum question entity.

use forum_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{ConfidentialRecord, EntitySchema, FieldValue};
use crate::user::UserId;

/// Maximum title length in characters.
pub const QUESTION_TITLE_MAX_LENGTH: usize = 100;

/// Declared fields of [`Question`]. The only place field names are spelled out.
pub static QUESTION_SCHEMA: EntitySchema = EntitySchema::new(
    "question",
    &[
        Question::TITLE,
        Question::BODY,
        Question::CREATOR,
        Question::IS_PUBLISHED,
    ],
    Question::CREATOR,
    Some(Question::IS_PUBLISHED),
);

/// Unique identifier for a question row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Creates a new random question identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a question identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Question posted to the forum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    title: NonEmptyString,
    body: NonEmptyString,
    creator: UserId,
    is_published: bool,
}

impl Question {
    /// Title field name.
    pub const TITLE: &'static str = "title";
    /// Body field name.
    pub const BODY: &'static str = "body";
    /// Ownership field name.
    pub const CREATOR: &'static str = "creator";
    /// Publication flag field name.
    pub const IS_PUBLISHED: &'static str = "is_published";

    /// Creates a new published question owned by `creator`.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        creator: UserId,
    ) -> AppResult<Self> {
        Self::from_parts(QuestionId::new(), title, body, creator, true)
    }

    /// Rebuilds a question from stored values.
    pub fn from_parts(
        id: QuestionId,
        title: impl Into<String>,
        body: impl Into<String>,
        creator: UserId,
        is_published: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            title: validate_title(title)?,
            body: NonEmptyString::new(body)?,
            creator,
            is_published,
        })
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Returns the creator.
    #[must_use]
    pub fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns whether the question is public.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.is_published
    }

    /// Applies validated changes in place.
    pub fn apply(&mut self, changes: QuestionChanges) -> AppResult<()> {
        let QuestionChanges {
            title,
            body,
            creator,
            is_published,
        } = changes;

        let title = title.map(validate_title).transpose()?;
        let body = body.map(NonEmptyString::new).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        if let Some(creator) = creator {
            self.creator = creator;
        }
        if let Some(is_published) = is_published {
            self.is_published = is_published;
        }

        Ok(())
    }
}

impl ConfidentialRecord for Question {
    fn schema() -> &'static EntitySchema {
        &QUESTION_SCHEMA
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            Self::TITLE => Some(FieldValue::Text(self.title().to_owned())),
            Self::BODY => Some(FieldValue::Text(self.body().to_owned())),
            Self::CREATOR => Some(FieldValue::User(self.creator)),
            Self::IS_PUBLISHED => Some(FieldValue::Bool(self.is_published)),
            _ => None,
        }
    }
}

fn validate_title(title: impl Into<String>) -> AppResult<NonEmptyString> {
    let title = NonEmptyString::new(title)?;
    if title.char_count() > QUESTION_TITLE_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "question title must not exceed {QUESTION_TITLE_MAX_LENGTH} characters"
        )));
    }

    Ok(title)
}

/// Values supplied by the add form. Absent fields were not submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    /// Submitted title.
    pub title: Option<String>,
    /// Submitted body.
    pub body: Option<String>,
    /// Submitted publication flag.
    pub is_published: Option<bool>,
}

impl QuestionDraft {
    /// Returns the names of the submitted fields.
    #[must_use]
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push(Question::TITLE);
        }
        if self.body.is_some() {
            fields.push(Question::BODY);
        }
        if self.is_published.is_some() {
            fields.push(Question::IS_PUBLISHED);
        }
        fields
    }

    /// Builds the question, stamping `creator` as owner.
    pub fn into_question(self, creator: UserId) -> AppResult<Question> {
        let title = self.title.ok_or_else(|| {
            AppError::Validation(format!("field '{}' is required", Question::TITLE))
        })?;
        let body = self.body.ok_or_else(|| {
            AppError::Validation(format!("field '{}' is required", Question::BODY))
        })?;

        Question::from_parts(
            QuestionId::new(),
            title,
            body,
            creator,
            self.is_published.unwrap_or(true),
        )
    }
}

/// Field changes submitted by the change form. Absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionChanges {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New creator.
    pub creator: Option<UserId>,
    /// New publication flag.
    pub is_published: Option<bool>,
}

impl QuestionChanges {
    /// Checks the submitted values without touching any row.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(title) = &self.title {
            validate_title(title.as_str())?;
        }
        if let Some(body) = &self.body {
            NonEmptyString::new(body.as_str())?;
        }

        Ok(())
    }

    /// Returns the names of the touched fields.
    #[must_use]
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push(Question::TITLE);
        }
        if self.body.is_some() {
            fields.push(Question::BODY);
        }
        if self.creator.is_some() {
            fields.push(Question::CREATOR);
        }
        if self.is_published.is_some() {
            fields.push(Question::IS_PUBLISHED);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{ConfidentialRecord, FieldValue};
    use crate::user::UserId;

    use super::{
        QUESTION_SCHEMA, QUESTION_TITLE_MAX_LENGTH, Question, QuestionChanges, QuestionDraft,
    };

    #[test]
    fn schema_is_consistent() {
        assert!(QUESTION_SCHEMA.validate().is_ok());
        assert_eq!(QUESTION_SCHEMA.ownership_field(), "creator");
        assert_eq!(QUESTION_SCHEMA.publication_field(), Some("is_published"));
    }

    #[test]
    fn new_question_is_published_by_default() {
        let question = Question::new("Lorem", "Foo bar", UserId::new());
        assert!(question.is_ok_and(|question| question.is_published()));
    }

    #[test]
    fn title_length_is_bounded() {
        assert!(Question::new("t".repeat(QUESTION_TITLE_MAX_LENGTH), "body", UserId::new()).is_ok());
        assert!(
            Question::new("t".repeat(QUESTION_TITLE_MAX_LENGTH + 1), "body", UserId::new()).is_err()
        );
        assert!(Question::new("  ", "body", UserId::new()).is_err());
    }

    #[test]
    fn every_declared_field_has_a_value() {
        let creator = UserId::new();
        let question = Question::new("Lorem", "Foo bar", creator)
            .unwrap_or_else(|_| unreachable!());

        for field in QUESTION_SCHEMA.fields() {
            assert!(question.field_value(field).is_some(), "missing value for {field}");
        }
        assert_eq!(question.field_value("author"), None);
        assert_eq!(question.owner(), Some(creator));
        assert_eq!(
            question.field_value("is_published"),
            Some(FieldValue::Bool(true))
        );
    }

    #[test]
    fn draft_requires_title_and_body() {
        let draft = QuestionDraft {
            title: Some("Lorem".to_owned()),
            ..QuestionDraft::default()
        };
        assert_eq!(draft.supplied_fields(), vec!["title"]);
        assert!(draft.into_question(UserId::new()).is_err());
    }

    #[test]
    fn invalid_change_leaves_question_untouched() {
        let mut question = Question::new("Lorem", "Foo bar", UserId::new())
            .unwrap_or_else(|_| unreachable!());
        let result = question.apply(QuestionChanges {
            title: Some(String::new()),
            body: Some("Changed".to_owned()),
            ..QuestionChanges::default()
        });

        assert!(result.is_err());
        assert_eq!(question.body(), "Foo bar");
    }

    #[test]
    fn changes_are_validated_before_reaching_a_row() {
        assert!(QuestionChanges::default().validate().is_ok());
        assert!(
            QuestionChanges {
                body: Some("  ".to_owned()),
                ..QuestionChanges::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            QuestionChanges {
                title: Some("t".repeat(QUESTION_TITLE_MAX_LENGTH + 1)),
                ..QuestionChanges::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn touched_fields_follow_declared_names() {
        let changes = QuestionChanges {
            body: Some("new".to_owned()),
            is_published: Some(false),
            ..QuestionChanges::default()
        };
        assert_eq!(changes.touched_fields(), vec!["body", "is_published"]);
    }
}
