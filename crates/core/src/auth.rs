use serde::{Deserialize, Serialize};

/// Identity asserted by the authenticating gateway in front of the service.
///
/// Carries no role data: roles and grants are always looked up fresh from the
/// permission source for each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
}

impl UserIdentity {
    /// Creates an identity for the given username.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    /// Returns the username asserted by the gateway.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}
