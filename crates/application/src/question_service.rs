use std::collections::BTreeMap;
use std::sync::Arc;

use forum_core::{AppError, AppResult, UserIdentity};
use forum_domain::{
    Action, Actor, FieldAccess, FieldSet, Question, QuestionChanges, QuestionDraft, QuestionId,
    QuestionPolicy, QuestionRules, UserId,
};
use tracing::debug;

use crate::{AuthorizationService, QuestionListQuery, QuestionRepository};

mod listing;
mod writes;

/// Question as exposed to one actor, redacted to the fields they may view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// Row identifier. Always present.
    pub id: QuestionId,
    /// Title when viewable.
    pub title: Option<String>,
    /// Body when viewable.
    pub body: Option<String>,
    /// Creator when viewable.
    pub creator: Option<UserId>,
    /// Publication flag when viewable.
    pub is_published: Option<bool>,
    /// Access classification for every declared field.
    pub field_access: BTreeMap<String, FieldAccess>,
}

impl QuestionView {
    fn redacted(
        question: &Question,
        viewable: &FieldSet,
        field_access: BTreeMap<&'static str, FieldAccess>,
    ) -> Self {
        let visible = |field: &str| viewable.contains(field);

        Self {
            id: question.id(),
            title: visible(Question::TITLE).then(|| question.title().to_owned()),
            body: visible(Question::BODY).then(|| question.body().to_owned()),
            creator: visible(Question::CREATOR).then_some(question.creator()),
            is_published: visible(Question::IS_PUBLISHED).then_some(question.is_published()),
            field_access: field_access
                .into_iter()
                .map(|(field, access)| (field.to_owned(), access))
                .collect(),
        }
    }
}

/// Table-wide answers for one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCapabilities {
    /// Whether the actor may add questions.
    pub can_add: bool,
    /// Whether the actor may view every question.
    pub can_view_all: bool,
    /// Whether the actor may change every question.
    pub can_change_all: bool,
    /// Whether the actor may delete every question.
    pub can_delete_all: bool,
    /// Whether questions should be offered to the actor at all.
    pub has_some_permissions: bool,
}

/// Application service for question reads and writes under the question policy.
#[derive(Clone)]
pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    authorization_service: AuthorizationService,
    policy: Arc<QuestionPolicy>,
}

impl QuestionService {
    /// Creates a new question service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            authorization_service,
            policy: Arc::new(QuestionPolicy::new(QuestionRules)),
        }
    }

    /// Returns the policy every decision is made with.
    #[must_use]
    pub fn policy(&self) -> &QuestionPolicy {
        &self.policy
    }

    /// Returns the table-wide capabilities of the caller.
    pub async fn question_capabilities(
        &self,
        identity: Option<&UserIdentity>,
    ) -> AppResult<QuestionCapabilities> {
        let actor = self.authorization_service.resolve_actor(identity).await?;

        Ok(QuestionCapabilities {
            can_add: self.policy.has_table_wide_add_permission(&actor),
            can_view_all: self.policy.has_table_wide_view_permission(&actor),
            can_change_all: self.policy.has_table_wide_change_permission(&actor),
            can_delete_all: self.policy.has_table_wide_delete_permission(&actor),
            has_some_permissions: self.policy.has_some_permissions(&actor)?,
        })
    }

    /// Returns the fields the caller may fill in when adding a question.
    pub async fn add_form(&self, identity: Option<&UserIdentity>) -> AppResult<FieldSet> {
        let actor = self.authorization_service.resolve_actor(identity).await?;
        self.require_add(&actor)?;
        self.policy.addable_fields(&actor)
    }

    fn require_add(&self, actor: &Actor) -> AppResult<()> {
        if self.policy.has_table_wide_add_permission(actor) {
            return Ok(());
        }

        debug!(tier = ?actor.tier(), "denied question add");
        Err(AppError::Forbidden(
            "adding questions is not permitted".to_owned(),
        ))
    }

    fn view(&self, actor: &Actor, question: &Question) -> AppResult<QuestionView> {
        let viewable = self.policy.viewable_fields(actor, question)?;
        let field_access = self.policy.field_access(actor, question)?;
        Ok(QuestionView::redacted(question, &viewable, field_access))
    }

    /// Loads a row for `action`. Rows outside the actor's view rows are
    /// reported missing whatever the action.
    async fn load_for(
        &self,
        actor: &Actor,
        action: Action,
        question_id: QuestionId,
    ) -> AppResult<Question> {
        let not_found = || AppError::NotFound(format!("question '{question_id}' not found"));

        let question = self
            .repository
            .find_question(question_id)
            .await?
            .ok_or_else(not_found)?;

        if !self.policy.permits_row(actor, Action::View, &question)? {
            return Err(not_found());
        }

        if action == Action::View || self.policy.permits_row(actor, action, &question)? {
            return Ok(question);
        }

        debug!(
            tier = ?actor.tier(),
            action = action.as_str(),
            question_id = %question_id,
            "denied question row"
        );
        Err(AppError::Forbidden(format!(
            "{} is not permitted on question '{question_id}'",
            action.as_str()
        )))
    }
}

fn require_fields(
    allowed: &FieldSet,
    requested: &[&'static str],
    action: Action,
    actor: &Actor,
) -> AppResult<()> {
    match requested.iter().find(|field| !allowed.contains(field)) {
        None => Ok(()),
        Some(field) => {
            debug!(
                tier = ?actor.tier(),
                action = action.as_str(),
                field = %field,
                "denied question field"
            );
            Err(AppError::Forbidden(format!(
                "field '{field}' may not be set on {}",
                action.as_str()
            )))
        }
    }
}
