use async_trait::async_trait;
use forum_core::AppResult;
use forum_domain::{Permission, UserAccount, UserId};

/// Repository port for accounts and their table-wide permission grants.
///
/// This is the role/permission source every policy decision is built from.
/// Implementations must surface lookup failures as errors, never as an empty
/// grant list.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by login name.
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<UserAccount>>;

    /// Finds an account by identifier.
    async fn find_account(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists explicit table-wide permissions granted to an account.
    async fn list_permissions_for_account(&self, user_id: UserId) -> AppResult<Vec<Permission>>;

    /// Persists a new account. Fails with a conflict for a taken username.
    async fn save_account(&self, account: UserAccount) -> AppResult<()>;

    /// Grants a permission. Granting twice is a no-op.
    async fn grant_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()>;

    /// Revokes a permission. Revoking a missing grant is a no-op.
    async fn revoke_permission(&self, user_id: UserId, permission: Permission) -> AppResult<()>;

    /// Deletes an account. Fails with a conflict while questions reference it.
    async fn delete_account(&self, user_id: UserId) -> AppResult<()>;
}
