//! In-memory fakes shared by the service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use forum_core::{AppError, AppResult};
use forum_domain::{
    AccountRole, Permission, Question, QuestionChanges, QuestionId, RowFilter, UserAccount,
    UserId,
};
use tokio::sync::Mutex;

use crate::{AccountRepository, QuestionListQuery, QuestionRepository};

#[derive(Default)]
pub(crate) struct FakeAccountRepository {
    accounts: Mutex<HashMap<String, UserAccount>>,
    grants: Mutex<HashMap<UserId, Vec<Permission>>>,
    owned_questions: Mutex<Vec<UserId>>,
    fail_permission_lookup: bool,
}

impl FakeAccountRepository {
    pub(crate) fn failing_permission_lookup() -> Self {
        Self {
            fail_permission_lookup: true,
            ..Self::default()
        }
    }

    pub(crate) async fn with_account(self, account: UserAccount, grants: Vec<Permission>) -> Self {
        self.grants.lock().await.insert(account.id(), grants);
        self.accounts
            .lock()
            .await
            .insert(account.username().as_str().to_owned(), account);
        self
    }

    pub(crate) async fn mark_question_owner(&self, user_id: UserId) {
        self.owned_questions.lock().await.push(user_id);
    }

    pub(crate) async fn grants_of(&self, user_id: UserId) -> Vec<Permission> {
        self.grants
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AccountRepository for FakeAccountRepository {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        Ok(self.accounts.lock().await.get(username).cloned())
    }

    async fn find_account(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .values()
            .find(|account| account.id() == user_id)
            .cloned())
    }

    async fn list_permissions_for_account(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        if self.fail_permission_lookup {
            return Err(AppError::Internal(
                "permission store unavailable".to_owned(),
            ));
        }

        Ok(self.grants_of(user_id).await)
    }

    async fn save_account(&self, account: UserAccount) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        let username = account.username().as_str().to_owned();
        if accounts.contains_key(&username) {
            return Err(AppError::Conflict(format!(
                "account '{username}' already exists"
            )));
        }
        accounts.insert(username, account);
        Ok(())
    }

    async fn grant_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()> {
        let mut grants = self.grants.lock().await;
        let entry = grants.entry(user_id).or_default();
        if !entry.contains(&permission) {
            entry.push(permission);
        }
        Ok(())
    }

    async fn revoke_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()> {
        if let Some(grants) = self.grants.lock().await.get_mut(&user_id) {
            grants.retain(|grant| grant != &permission);
        }
        Ok(())
    }

    async fn delete_account(&self, user_id: UserId) -> AppResult<()> {
        if self.owned_questions.lock().await.contains(&user_id) {
            return Err(AppError::Conflict(format!(
                "account '{user_id}' still owns questions"
            )));
        }

        self.accounts
            .lock()
            .await
            .retain(|_, account| account.id() != user_id);
        self.grants.lock().await.remove(&user_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeQuestionRepository {
    questions: Mutex<Vec<Question>>,
    fail_storage: bool,
}

pub(crate) const QUESTION_STORE_FAILURE: &str = "question store unavailable";

impl FakeQuestionRepository {
    pub(crate) fn failing_storage() -> Self {
        Self {
            fail_storage: true,
            ..Self::default()
        }
    }

    fn check_storage(&self) -> AppResult<()> {
        if self.fail_storage {
            return Err(AppError::Internal(QUESTION_STORE_FAILURE.to_owned()));
        }
        Ok(())
    }

    pub(crate) async fn with_questions(self, questions: Vec<Question>) -> Self {
        self.questions.lock().await.extend(questions);
        self
    }

    pub(crate) async fn stored(&self, question_id: QuestionId) -> Option<Question> {
        self.questions
            .lock()
            .await
            .iter()
            .find(|question| question.id() == question_id)
            .cloned()
    }
}

#[async_trait]
impl QuestionRepository for FakeQuestionRepository {
    async fn list_questions(
        &self,
        filter: &RowFilter,
        query: QuestionListQuery,
    ) -> AppResult<Vec<Question>> {
        self.check_storage()?;

        let questions = self.questions.lock().await;
        let mut visible = Vec::new();
        for question in questions.iter().rev() {
            if filter.matches(question)? {
                visible.push(question.clone());
            }
        }

        Ok(visible
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn find_question(&self, question_id: QuestionId) -> AppResult<Option<Question>> {
        self.check_storage()?;
        Ok(self.stored(question_id).await)
    }

    async fn insert_question(&self, question: Question) -> AppResult<()> {
        self.check_storage()?;
        self.questions.lock().await.push(question);
        Ok(())
    }

    async fn update_question(
        &self,
        question_id: QuestionId,
        changes: QuestionChanges,
    ) -> AppResult<Question> {
        self.check_storage()?;

        let mut questions = self.questions.lock().await;
        let stored = questions
            .iter_mut()
            .find(|stored| stored.id() == question_id)
            .ok_or_else(|| AppError::NotFound(format!("question '{question_id}' not found")))?;
        stored.apply(changes)?;
        Ok(stored.clone())
    }

    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()> {
        self.check_storage()?;
        self.questions
            .lock()
            .await
            .retain(|question| question.id() != question_id);
        Ok(())
    }
}

pub(crate) fn account(username: &str, role: AccountRole) -> UserAccount {
    UserAccount::new(username, role).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn permission(codename: &str) -> Permission {
    codename.parse().unwrap_or_else(|_| unreachable!())
}
