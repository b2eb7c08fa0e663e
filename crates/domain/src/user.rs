//! User account domain types.

use std::str::FromStr;

use forum_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated login name.
///
/// Letters, digits and `@.+-_` only, at most [`USERNAME_MAX_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(AppError::Validation(
                "username must not be empty".to_owned(),
            ));
        }

        if value.chars().count() > USERNAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "username must not exceed {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if let Some(invalid) = value
            .chars()
            .find(|character| !(character.is_alphanumeric() || "@.+-_".contains(*character)))
        {
            return Err(AppError::Validation(format!(
                "username contains invalid character '{invalid}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the username string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Role flag persisted with an account.
///
/// A superuser is always staff as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Regular signed-in member.
    Member,
    /// Moderation staff.
    Staff,
    /// Unrestricted administrator.
    Superuser,
}

impl AccountRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Staff => "staff",
            Self::Superuser => "superuser",
        }
    }
}

impl FromStr for AccountRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "staff" => Ok(Self::Staff),
            "superuser" => Ok(Self::Superuser),
            _ => Err(AppError::Validation(format!(
                "unknown account role '{value}'"
            ))),
        }
    }
}

/// Persisted user account as exposed by the permission source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: UserId,
    username: Username,
    role: AccountRole,
    is_active: bool,
}

impl UserAccount {
    /// Creates a new active account with a fresh identifier.
    pub fn new(username: impl Into<String>, role: AccountRole) -> AppResult<Self> {
        Self::from_parts(UserId::new(), username, role, true)
    }

    /// Rebuilds an account from stored values.
    pub fn from_parts(
        id: UserId,
        username: impl Into<String>,
        role: AccountRole,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            username: Username::new(username)?,
            role,
            is_active,
        })
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the persisted role flag.
    #[must_use]
    pub fn role(&self) -> AccountRole {
        self.role
    }

    /// Returns whether the account may act at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns a copy with the active flag replaced.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AccountRole, USERNAME_MAX_LENGTH, UserAccount, Username};

    #[test]
    fn username_accepts_django_style_characters() {
        assert!(Username::new("user.one+forum@example-site_1").is_ok());
    }

    #[test]
    fn username_rejects_spaces_and_overlong_values() {
        assert!(Username::new("user one").is_err());
        assert!(Username::new("").is_err());
        assert!(Username::new("u".repeat(USERNAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn account_role_roundtrip_storage_value() {
        for role in [AccountRole::Member, AccountRole::Staff, AccountRole::Superuser] {
            let restored = AccountRole::from_str(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(AccountRole::Member), role);
        }
    }

    #[test]
    fn new_account_is_active() {
        let account = UserAccount::new("user_one", AccountRole::Member);
        assert!(account.is_ok());
        assert!(account.map(|account| account.is_active()).unwrap_or(false));
    }
}
