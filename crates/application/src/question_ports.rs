use async_trait::async_trait;
use forum_core::AppResult;
use forum_domain::{Question, QuestionChanges, QuestionId, RowFilter};

/// Paging for question listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionListQuery {
    /// Maximum rows to return.
    pub limit: usize,
    /// Rows to skip.
    pub offset: usize,
}

impl Default for QuestionListQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// Repository port for question rows.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Lists rows selected by `filter`, newest first.
    async fn list_questions(
        &self,
        filter: &RowFilter,
        query: QuestionListQuery,
    ) -> AppResult<Vec<Question>>;

    /// Finds one row by identifier.
    async fn find_question(&self, question_id: QuestionId) -> AppResult<Option<Question>>;

    /// Inserts a new row.
    async fn insert_question(&self, question: Question) -> AppResult<()>;

    /// Writes only the touched fields of `changes` and returns the stored row.
    ///
    /// Untouched fields keep whatever value is stored at write time.
    async fn update_question(
        &self,
        question_id: QuestionId,
        changes: QuestionChanges,
    ) -> AppResult<Question>;

    /// Deletes a row.
    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()>;
}
