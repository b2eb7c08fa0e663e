use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use forum_domain::{AccountRole, Permission};

use crate::dto::{AccountResponse, CreateAccountRequest};
use crate::error::ApiResult;
use crate::middleware::CallerIdentity;
use crate::state::AppState;

pub async fn create_account_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let role = AccountRole::from_str(payload.role.as_str())?;
    let account = state
        .account_service
        .register_account(identity.get(), payload.username.as_str(), role)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

pub async fn grant_permission_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path((username, permission)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .grant_permission(
            identity.get(),
            username.as_str(),
            Permission::from_str(permission.as_str())?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_permission_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path((username, permission)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .revoke_permission(
            identity.get(),
            username.as_str(),
            Permission::from_str(permission.as_str())?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_account_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .account_service
        .delete_account(identity.get(), username.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
