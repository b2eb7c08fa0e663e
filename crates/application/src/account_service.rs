use std::sync::Arc;

use forum_core::{AppError, AppResult, UserIdentity};
use forum_domain::{AccountRole, Permission, UserAccount};
use tracing::info;

use crate::{AccountRepository, AuthorizationService};

/// Superuser-only administration of accounts and their table-wide grants.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    authorization_service: AuthorizationService,
}

impl AccountService {
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            authorization_service,
        }
    }

    /// Registers a new active account.
    pub async fn register_account(
        &self,
        identity: Option<&UserIdentity>,
        username: &str,
        role: AccountRole,
    ) -> AppResult<UserAccount> {
        self.authorization_service.require_superuser(identity).await?;

        let account = UserAccount::new(username, role)?;
        self.repository.save_account(account.clone()).await?;

        info!(username = %account.username(), role = role.as_str(), "registered account");
        Ok(account)
    }

    /// Grants a table-wide permission to an account.
    pub async fn grant_permission(
        &self,
        identity: Option<&UserIdentity>,
        username: &str,
        permission: Permission,
    ) -> AppResult<()> {
        self.authorization_service.require_superuser(identity).await?;

        let account = self.require_account(username).await?;
        self.repository
            .grant_permission(account.id(), permission.clone())
            .await?;

        info!(username, permission = %permission, "granted permission");
        Ok(())
    }

    /// Revokes a table-wide permission from an account.
    pub async fn revoke_permission(
        &self,
        identity: Option<&UserIdentity>,
        username: &str,
        permission: Permission,
    ) -> AppResult<()> {
        self.authorization_service.require_superuser(identity).await?;

        let account = self.require_account(username).await?;
        self.repository
            .revoke_permission(account.id(), permission.clone())
            .await?;

        info!(username, permission = %permission, "revoked permission");
        Ok(())
    }

    /// Deletes an account that no longer owns questions.
    pub async fn delete_account(&self, identity: Option<&UserIdentity>, username: &str) -> AppResult<()> {
        self.authorization_service.require_superuser(identity).await?;

        let account = self.require_account(username).await?;
        self.repository.delete_account(account.id()).await?;

        info!(username, "deleted account");
        Ok(())
    }

    async fn require_account(&self, username: &str) -> AppResult<UserAccount> {
        self.repository
            .find_account_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{username}' does not exist")))
    }
}
