use async_trait::async_trait;
use forum_application::{QuestionListQuery, QuestionRepository};
use forum_core::{AppError, AppResult};
use forum_domain::{Question, QuestionChanges, QuestionId, RowFilter, UserId};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database_error::{internal_error, map_database_error};

mod row_filter_sql;

use row_filter_sql::push_row_filter;

/// PostgreSQL-backed repository for question rows.
///
/// Row filters are compiled into the `WHERE` clause so visibility is decided
/// by the database, not after fetching.
#[derive(Clone)]
pub struct PostgresQuestionRepository {
    pool: PgPool,
}

impl PostgresQuestionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: Uuid,
    title: String,
    body: String,
    creator_id: Uuid,
    is_published: bool,
}

impl QuestionRow {
    fn into_question(self) -> AppResult<Question> {
        let id = QuestionId::from_uuid(self.id);
        Question::from_parts(
            id,
            self.title,
            self.body,
            UserId::from_uuid(self.creator_id),
            self.is_published,
        )
        .map_err(|error| AppError::Internal(format!("failed to decode question '{id}': {error}")))
    }
}

fn missing_creator(creator: UserId, question_id: QuestionId) -> AppError {
    AppError::Validation(format!(
        "creator '{creator}' of question '{question_id}' does not exist"
    ))
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn list_questions(
        &self,
        filter: &RowFilter,
        query: QuestionListQuery,
    ) -> AppResult<Vec<Question>> {
        let limit = i64::try_from(query.limit)
            .map_err(|_| AppError::Validation("limit is out of range".to_owned()))?;
        let offset = i64::try_from(query.offset)
            .map_err(|_| AppError::Validation("offset is out of range".to_owned()))?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, title, body, creator_id, is_published FROM questions WHERE ",
        );
        push_row_filter(&mut builder, filter)?;
        builder.push(" ORDER BY insertion_order DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<QuestionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| internal_error("failed to list questions", error))?;

        rows.into_iter().map(QuestionRow::into_question).collect()
    }

    async fn find_question(&self, question_id: QuestionId) -> AppResult<Option<Question>> {
        sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, title, body, creator_id, is_published
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal_error("failed to find question", error))?
        .map(QuestionRow::into_question)
        .transpose()
    }

    async fn insert_question(&self, question: Question) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, title, body, creator_id, is_published)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(question.id().as_uuid())
        .bind(question.title())
        .bind(question.body())
        .bind(question.creator().as_uuid())
        .bind(question.is_published())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_database_error("failed to insert question", error, || {
                missing_creator(question.creator(), question.id())
            })
        })?;

        Ok(())
    }

    async fn update_question(
        &self,
        question_id: QuestionId,
        changes: QuestionChanges,
    ) -> AppResult<Question> {
        changes.validate()?;
        let creator = changes.creator;

        sqlx::query_as::<_, QuestionRow>(
            r#"
            UPDATE questions
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                creator_id = COALESCE($4, creator_id),
                is_published = COALESCE($5, is_published)
            WHERE id = $1
            RETURNING id, title, body, creator_id, is_published
            "#,
        )
        .bind(question_id.as_uuid())
        .bind(changes.title)
        .bind(changes.body)
        .bind(creator.map(|creator| creator.as_uuid()))
        .bind(changes.is_published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_database_error("failed to update question", error, || match creator {
                Some(creator) => missing_creator(creator, question_id),
                None => AppError::Internal(format!(
                    "failed to update question '{question_id}': unexpected foreign key violation"
                )),
            })
        })?
        .ok_or_else(|| AppError::NotFound(format!("question '{question_id}' not found")))?
        .into_question()
    }

    async fn delete_question(&self, question_id: QuestionId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| internal_error("failed to delete question", error))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "question '{question_id}' not found"
            )));
        }

        Ok(())
    }
}
