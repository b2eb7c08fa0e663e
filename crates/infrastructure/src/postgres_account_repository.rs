use std::str::FromStr;

use async_trait::async_trait;
use forum_application::AccountRepository;
use forum_core::{AppError, AppResult};
use forum_domain::{AccountRole, Permission, UserAccount, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database_error::{internal_error, map_database_error};

/// PostgreSQL-backed repository for accounts and their permission grants.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    role: String,
    is_active: bool,
}

impl AccountRow {
    fn into_account(self) -> AppResult<UserAccount> {
        let role = AccountRole::from_str(self.role.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode role for account '{}': {error}",
                self.username
            ))
        })?;

        UserAccount::from_parts(UserId::from_uuid(self.id), self.username, role, self.is_active)
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    permission: String,
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, role, is_active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal_error("failed to find account by username", error))?
        .map(AccountRow::into_account)
        .transpose()
    }

    async fn find_account(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, role, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| internal_error("failed to find account", error))?
        .map(AccountRow::into_account)
        .transpose()
    }

    async fn list_permissions_for_account(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permission
            FROM user_permissions
            WHERE user_id = $1
            ORDER BY permission
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| internal_error("failed to load permissions", error))?;

        rows.into_iter()
            .map(|row| {
                Permission::from_str(row.permission.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode permission '{}' for account '{user_id}': {error}",
                        row.permission
                    ))
                })
            })
            .collect()
    }

    async fn save_account(&self, account: UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, role, is_active)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.username().as_str())
        .bind(account.role().as_str())
        .bind(account.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_database_error("failed to save account", error, || {
                AppError::Internal("unexpected reference while saving account".to_owned())
            })
        })
        .map_err(|error| match error {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "account '{}' already exists",
                account.username()
            )),
            other => other,
        })?;

        Ok(())
    }

    async fn grant_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_permissions (user_id, permission)
            VALUES ($1, $2)
            ON CONFLICT (user_id, permission) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(permission.codename())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_database_error("failed to grant permission", error, || {
                AppError::NotFound(format!("account '{user_id}' does not exist"))
            })
        })?;

        Ok(())
    }

    async fn revoke_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM user_permissions
            WHERE user_id = $1 AND permission = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(permission.codename())
        .execute(&self.pool)
        .await
        .map_err(|error| internal_error("failed to revoke permission", error))?;

        Ok(())
    }

    async fn delete_account(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_database_error("failed to delete account", error, || {
                AppError::Conflict(format!(
                    "account '{user_id}' is still the creator of questions"
                ))
            })
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "account '{user_id}' does not exist"
            )));
        }

        Ok(())
    }
}
