use std::sync::Arc;

use forum_application::{
    AccountRepository, AccountService, AuthorizationService, QuestionRepository, QuestionService,
    SiteAccessGate,
};
use forum_core::{AppError, AppResult};
use forum_infrastructure::{
    InMemoryForumRepository, MIGRATOR, PostgresAccountRepository, PostgresQuestionRepository,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend};
use crate::state::AppState;

/// Repository pair backing the services.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub questions: Arc<dyn QuestionRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let repository = Arc::new(InMemoryForumRepository::new());
        Self {
            accounts: repository.clone(),
            questions: repository,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
            questions: Arc::new(PostgresQuestionRepository::new(pool)),
        }
    }
}

pub async fn connect_database(database_url: &str) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub async fn build_repositories(config: &ApiConfig) -> AppResult<Repositories> {
    match &config.storage {
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Ok(Repositories::in_memory())
        }
        StorageBackend::Postgres { database_url } => {
            let pool = connect_database(database_url).await?;
            info!("using postgres storage");
            Ok(Repositories::postgres(pool))
        }
    }
}

pub fn build_app_state(repositories: &Repositories, config: &ApiConfig) -> AppState {
    let authorization_service = AuthorizationService::new(repositories.accounts.clone());

    AppState {
        question_service: QuestionService::new(
            repositories.questions.clone(),
            authorization_service.clone(),
        ),
        account_service: AccountService::new(
            repositories.accounts.clone(),
            authorization_service.clone(),
        ),
        authorization_service,
        site_gate: SiteAccessGate::new(&config.superuser_only_segments),
        identity_header: config.identity_header.clone(),
    }
}
