use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use forum_core::{AppError, UserIdentity};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Identity asserted by the trusted upstream gateway, absent for anonymous callers.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity(pub Option<UserIdentity>);

impl CallerIdentity {
    pub fn get(&self) -> Option<&UserIdentity> {
        self.0.as_ref()
    }
}

pub async fn attach_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = match request.headers().get(&state.identity_header) {
        None => None,
        Some(value) => {
            let subject = value.to_str().map_err(|_| {
                AppError::Validation(format!(
                    "header '{}' must be visible ASCII",
                    state.identity_header
                ))
            })?;
            let subject = subject.trim();
            (!subject.is_empty()).then(|| UserIdentity::new(subject))
        }
    };

    request.extensions_mut().insert(CallerIdentity(identity));
    Ok(next.run(request).await)
}

pub async fn enforce_site_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let path = request.uri().path().to_owned();

    if state.site_gate.guards(&path) {
        let identity = request
            .extensions()
            .get::<CallerIdentity>()
            .cloned()
            .unwrap_or_default();
        let actor = state
            .authorization_service
            .resolve_actor(identity.get())
            .await?;

        if !state.site_gate.is_reachable(&path, &actor) {
            debug!(path = %path, tier = ?actor.tier(), "site gate denied request");
            return Err(AppError::Forbidden(format!("path '{path}' is restricted to superusers")).into());
        }
    }

    Ok(next.run(request).await)
}
