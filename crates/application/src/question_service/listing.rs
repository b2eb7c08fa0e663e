use super::*;

impl QuestionService {
    /// Lists the questions the caller may view, newest first.
    pub async fn list_questions(
        &self,
        identity: Option<&UserIdentity>,
        query: QuestionListQuery,
    ) -> AppResult<Vec<QuestionView>> {
        let actor = self.authorization_service.resolve_actor(identity).await?;
        let rows = self.policy.rows_with_view_permission(&actor)?;

        if rows.is_nothing() {
            return Ok(Vec::new());
        }

        self.repository
            .list_questions(&rows, query)
            .await?
            .iter()
            .map(|question| self.view(&actor, question))
            .collect()
    }

    /// Returns one question redacted for the caller.
    ///
    /// Rows outside the caller's view set are reported as missing.
    pub async fn get_question(
        &self,
        identity: Option<&UserIdentity>,
        question_id: QuestionId,
    ) -> AppResult<QuestionView> {
        let actor = self.authorization_service.resolve_actor(identity).await?;
        let question = self.load_for(&actor, Action::View, question_id).await?;
        self.view(&actor, &question)
    }
}
