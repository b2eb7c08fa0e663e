//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod database_error;
mod in_memory_forum_repository;
mod postgres_account_repository;
mod postgres_question_repository;

pub use in_memory_forum_repository::InMemoryForumRepository;
pub use postgres_account_repository::PostgresAccountRepository;
pub use postgres_question_repository::PostgresQuestionRepository;

/// Embedded schema migrations for the PostgreSQL adapters.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
