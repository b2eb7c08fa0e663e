use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use forum_application::{AccountRepository, QuestionListQuery, QuestionRepository};
use forum_core::{AppError, AppResult};
use forum_domain::{
    Permission, Question, QuestionChanges, QuestionId, RowFilter, UserAccount, UserId,
};
use tokio::sync::RwLock;

/// In-memory store backing both the account and the question ports.
///
/// Questions keep insertion order; listings read it back to front. Lock
/// order is questions before accounts before grants.
#[derive(Debug, Default)]
pub struct InMemoryForumRepository {
    questions: RwLock<Vec<Question>>,
    accounts: RwLock<HashMap<UserId, UserAccount>>,
    grants: RwLock<HashMap<UserId, BTreeSet<Permission>>>,
}

impl InMemoryForumRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn require_creator(&self, creator: UserId, question_id: QuestionId) -> AppResult<()> {
        if self.accounts.read().await.contains_key(&creator) {
            return Ok(());
        }

        Err(AppError::Validation(format!(
            "creator '{creator}' of question '{question_id}' does not exist"
        )))
    }
}

#[async_trait]
impl AccountRepository for InMemoryForumRepository {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.username().as_str() == username)
            .cloned())
    }

    async fn find_account(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.accounts.read().await.get(&user_id).cloned())
    }

    async fn list_permissions_for_account(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        Ok(self
            .grants
            .read()
            .await
            .get(&user_id)
            .map(|grants| grants.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_account(&self, account: UserAccount) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.id())
            || accounts
                .values()
                .any(|stored| stored.username() == account.username())
        {
            return Err(AppError::Conflict(format!(
                "account '{}' already exists",
                account.username()
            )));
        }

        accounts.insert(account.id(), account);
        Ok(())
    }

    async fn grant_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()> {
        if !self.accounts.read().await.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("account '{user_id}' does not exist")));
        }

        self.grants
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(permission);
        Ok(())
    }

    async fn revoke_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()> {
        if let Some(grants) = self.grants.write().await.get_mut(&user_id) {
            grants.remove(&permission);
        }
        Ok(())
    }

    async fn delete_account(&self, user_id: UserId) -> AppResult<()> {
        let questions = self.questions.read().await;
        if questions.iter().any(|question| question.creator() == user_id) {
            return Err(AppError::Conflict(format!(
                "account '{user_id}' is still the creator of questions"
            )));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.remove(&user_id).is_none() {
            return Err(AppError::NotFound(format!("account '{user_id}' does not exist")));
        }
        self.grants.write().await.remove(&user_id);

        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryForumRepository {
    async fn list_questions(
        &self,
        filter: &RowFilter,
        query: QuestionListQuery,
    ) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;

        let mut selected = Vec::new();
        for question in questions.iter().rev() {
            if filter.matches(question)? {
                selected.push(question.clone());
            }
        }

        Ok(selected
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn find_question(&self, question_id: QuestionId) -> AppResult<Option<Question>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .find(|question| question.id() == question_id)
            .cloned())
    }

    async fn insert_question(&self, question: Question) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        if questions.iter().any(|stored| stored.id() == question.id()) {
            return Err(AppError::Conflict(format!(
                "question '{}' already exists",
                question.id()
            )));
        }
        self.require_creator(question.creator(), question.id()).await?;

        questions.push(question);
        Ok(())
    }

    async fn update_question(
        &self,
        question_id: QuestionId,
        changes: QuestionChanges,
    ) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if let Some(creator) = changes.creator {
            self.require_creator(creator, question_id).await?;
        }

        let stored = questions
            .iter_mut()
            .find(|stored| stored.id() == question_id)
            .ok_or_else(|| AppError::NotFound(format!("question '{question_id}' not found")))?;
        stored.apply(changes)?;

        Ok(stored.clone())
    }

    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|question| question.id() != question_id);

        if questions.len() == before {
            return Err(AppError::NotFound(format!("question '{question_id}' not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
