use std::fmt::{Display, Formatter};
use std::str::FromStr;

use forum_core::AppError;
use serde::{Deserialize, Serialize};

/// Table operations guarded by the confidential access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Creating new rows.
    Add,
    /// Reading rows.
    View,
    /// Mutating existing rows.
    Change,
    /// Removing rows.
    Delete,
}

impl Action {
    /// Returns the stable codename prefix for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::View => "view",
            Self::Change => "change",
            Self::Delete => "delete",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[Action::Add, Action::View, Action::Change, Action::Delete];

        ALL
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "add" => Ok(Self::Add),
            "view" => Ok(Self::View),
            "change" => Ok(Self::Change),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!("unknown action '{value}'"))),
        }
    }
}

/// Named table-wide permission such as `change_question`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    action: Action,
    entity: String,
}

impl Permission {
    /// Creates the permission for an action on an entity type.
    pub fn new(action: Action, entity: impl Into<String>) -> Result<Self, AppError> {
        let entity = entity.into();
        if entity.is_empty()
            || !entity
                .chars()
                .all(|character| character.is_ascii_lowercase() || character == '_')
        {
            return Err(AppError::Validation(format!(
                "invalid entity name '{entity}' in permission"
            )));
        }

        Ok(Self { action, entity })
    }

    /// Returns the guarded action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the entity type name.
    #[must_use]
    pub fn entity(&self) -> &str {
        self.entity.as_str()
    }

    /// Returns whether this permission guards `action` on `entity`.
    #[must_use]
    pub fn covers(&self, action: Action, entity: &str) -> bool {
        self.action == action && self.entity == entity
    }

    /// Returns the stable storage value, e.g. `view_question`.
    #[must_use]
    pub fn codename(&self) -> String {
        format!("{}_{}", self.action.as_str(), self.entity)
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}_{}", self.action.as_str(), self.entity)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (action, entity) = value.split_once('_').ok_or_else(|| {
            AppError::Validation(format!("unknown permission value '{value}'"))
        })?;

        Self::new(Action::from_str(action)?, entity)
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.codename()
    }
}
