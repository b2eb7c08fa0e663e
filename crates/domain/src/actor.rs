//! The per-request view of a user that every policy decision reads.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::security::{Action, Permission};
use crate::user::{AccountRole, UserAccount, UserId};

/// Role tiers in ascending order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    /// No identity was presented.
    Anonymous,
    /// Signed-in member without elevated flags.
    Authenticated,
    /// Moderation staff.
    Staff,
    /// Unrestricted administrator.
    Superuser,
}

/// Highest-precedence reason an actor has to perform one action on one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    /// Superusers pass every table-wide check.
    Superuser,
    /// The actor holds the explicit `<action>_<entity>` permission.
    TableWide,
    /// Staff member without the explicit permission.
    Staff(UserId),
    /// Signed-in member without the explicit permission.
    Authenticated(UserId),
    /// No identity.
    Anonymous,
}

/// Immutable snapshot of one user's role and grants, resolved per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    tier: RoleTier,
    user_id: Option<UserId>,
    grants: BTreeSet<Permission>,
}

impl Actor {
    /// Returns the actor used when no identity was presented.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            tier: RoleTier::Anonymous,
            user_id: None,
            grants: BTreeSet::new(),
        }
    }

    /// Creates a signed-in member.
    #[must_use]
    pub fn member(user_id: UserId) -> Self {
        Self::with_tier(RoleTier::Authenticated, user_id)
    }

    /// Creates a staff member.
    #[must_use]
    pub fn staff(user_id: UserId) -> Self {
        Self::with_tier(RoleTier::Staff, user_id)
    }

    /// Creates a superuser.
    #[must_use]
    pub fn superuser(user_id: UserId) -> Self {
        Self::with_tier(RoleTier::Superuser, user_id)
    }

    /// Builds the actor for an active account and its current grants.
    #[must_use]
    pub fn from_account(account: &UserAccount, grants: impl IntoIterator<Item = Permission>) -> Self {
        let tier = match account.role() {
            AccountRole::Member => RoleTier::Authenticated,
            AccountRole::Staff => RoleTier::Staff,
            AccountRole::Superuser => RoleTier::Superuser,
        };

        Self::with_tier(tier, account.id()).with_grants(grants)
    }

    fn with_tier(tier: RoleTier, user_id: UserId) -> Self {
        Self {
            tier,
            user_id: Some(user_id),
            grants: BTreeSet::new(),
        }
    }

    /// Adds explicit table-wide grants. Anonymous actors never hold grants.
    #[must_use]
    pub fn with_grants(mut self, grants: impl IntoIterator<Item = Permission>) -> Self {
        if self.user_id.is_some() {
            self.grants.extend(grants);
        }
        self
    }

    /// Returns the role tier.
    #[must_use]
    pub fn tier(&self) -> RoleTier {
        self.tier
    }

    /// Returns the user id, absent for anonymous actors.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the explicit grants.
    #[must_use]
    pub fn grants(&self) -> &BTreeSet<Permission> {
        &self.grants
    }

    /// Returns whether an identity was presented.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tier >= RoleTier::Authenticated
    }

    /// Returns whether the actor is staff (superusers included).
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.tier >= RoleTier::Staff
    }

    /// Returns whether the actor is a superuser.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.tier == RoleTier::Superuser
    }

    /// Returns whether the actor is the given user.
    #[must_use]
    pub fn is_user(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }

    /// Returns whether the actor explicitly holds `<action>_<entity>`.
    #[must_use]
    pub fn holds(&self, action: Action, entity: &str) -> bool {
        self.grants
            .iter()
            .any(|permission| permission.covers(action, entity))
    }

    /// Resolves the single highest-precedence tier for `action` on `entity`.
    ///
    /// Precedence: superuser, explicit table-wide grant, staff, member, anonymous.
    #[must_use]
    pub fn access_tier(&self, action: Action, entity: &str) -> AccessTier {
        if self.is_superuser() {
            return AccessTier::Superuser;
        }

        if self.holds(action, entity) {
            return AccessTier::TableWide;
        }

        match (self.tier, self.user_id) {
            (RoleTier::Staff, Some(user_id)) => AccessTier::Staff(user_id),
            (RoleTier::Authenticated, Some(user_id)) => AccessTier::Authenticated(user_id),
            _ => AccessTier::Anonymous,
        }
    }
}
