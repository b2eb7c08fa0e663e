use super::*;

impl QuestionService {
    /// Creates a question owned by the caller.
    pub async fn create_question(
        &self,
        identity: Option<&UserIdentity>,
        draft: QuestionDraft,
    ) -> AppResult<QuestionView> {
        let actor = self.authorization_service.resolve_actor(identity).await?;
        self.require_add(&actor)?;

        let addable = self.policy.addable_fields(&actor)?;
        require_fields(&addable, &draft.supplied_fields(), Action::Add, &actor)?;

        let creator = actor.user_id().ok_or_else(|| {
            AppError::Forbidden("anonymous callers cannot own questions".to_owned())
        })?;
        let question = draft.into_question(creator)?;

        self.repository.insert_question(question.clone()).await?;
        self.view(&actor, &question)
    }

    /// Applies field changes the caller is allowed to make.
    pub async fn update_question(
        &self,
        identity: Option<&UserIdentity>,
        question_id: QuestionId,
        changes: QuestionChanges,
    ) -> AppResult<QuestionView> {
        let actor = self.authorization_service.resolve_actor(identity).await?;
        let question = self.load_for(&actor, Action::Change, question_id).await?;

        let changeable = self.policy.changeable_fields(&actor, &question)?;
        require_fields(&changeable, &changes.touched_fields(), Action::Change, &actor)?;
        changes.validate()?;

        let stored = self
            .repository
            .update_question(question_id, changes)
            .await?;
        self.view(&actor, &stored)
    }

    /// Deletes a question the caller may delete.
    pub async fn delete_question(
        &self,
        identity: Option<&UserIdentity>,
        question_id: QuestionId,
    ) -> AppResult<()> {
        let actor = self.authorization_service.resolve_actor(identity).await?;
        let question = self.load_for(&actor, Action::Delete, question_id).await?;
        self.repository.delete_question(question.id()).await
    }
}
