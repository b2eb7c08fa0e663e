use forum_domain::UserAccount;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for account registration.
#[derive(Debug, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-account-request.ts"
)]
pub struct CreateAccountRequest {
    pub username: String,
    /// One of `member`, `staff` or `superuser`.
    pub role: String,
}

/// API representation of an account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/account-response.ts"
)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    pub is_active: bool,
}

impl From<UserAccount> for AccountResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            id: value.id().to_string(),
            username: value.username().as_str().to_owned(),
            role: value.role().as_str().to_owned(),
            is_active: value.is_active(),
        }
    }
}
