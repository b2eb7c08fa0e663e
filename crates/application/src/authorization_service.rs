use std::sync::Arc;

use forum_core::{AppError, AppResult, UserIdentity};
use forum_domain::Actor;
use tracing::debug;

use crate::AccountRepository;

/// Application service resolving request identities into policy actors.
///
/// Roles and grants are read from the repository on every call so that a
/// decision always reflects the current permission assignment.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AccountRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the actor for an optional gateway identity.
    ///
    /// A missing identity is the anonymous actor. An identity that does not
    /// match an active account is rejected.
    pub async fn resolve_actor(&self, identity: Option<&UserIdentity>) -> AppResult<Actor> {
        let Some(identity) = identity else {
            return Ok(Actor::anonymous());
        };

        let account = self
            .repository
            .find_account_by_username(identity.subject())
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(format!("unknown subject '{}'", identity.subject()))
            })?;

        if !account.is_active() {
            debug!(subject = %identity.subject(), "rejected inactive account");
            return Err(AppError::Unauthorized(format!(
                "account '{}' is disabled",
                identity.subject()
            )));
        }

        let grants = self
            .repository
            .list_permissions_for_account(account.id())
            .await?;

        Ok(Actor::from_account(&account, grants))
    }

    /// Resolves the actor and requires superuser status.
    pub async fn require_superuser(&self, identity: Option<&UserIdentity>) -> AppResult<Actor> {
        let actor = self.resolve_actor(identity).await?;

        if !actor.is_authenticated() {
            return Err(AppError::Unauthorized("authentication required".to_owned()));
        }

        if !actor.is_superuser() {
            return Err(AppError::Forbidden(format!(
                "subject '{}' is not a superuser",
                identity.map(UserIdentity::subject).unwrap_or_default()
            )));
        }

        Ok(actor)
    }
}

#[cfg(test)]
mod tests;
