use axum::http::HeaderName;
use forum_application::{AccountService, AuthorizationService, QuestionService, SiteAccessGate};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub question_service: QuestionService,
    pub account_service: AccountService,
    pub authorization_service: AuthorizationService,
    pub site_gate: SiteAccessGate,
    pub identity_header: HeaderName,
}
