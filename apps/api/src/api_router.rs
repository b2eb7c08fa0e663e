use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let question_routes = Router::new()
        .route(
            "/api/questions",
            get(handlers::questions::list_questions_handler)
                .post(handlers::questions::create_question_handler),
        )
        .route(
            "/api/questions/capabilities",
            get(handlers::questions::question_capabilities_handler),
        )
        .route(
            "/api/questions/add-form",
            get(handlers::questions::add_form_handler),
        )
        .route(
            "/api/questions/{question_id}",
            get(handlers::questions::get_question_handler)
                .put(handlers::questions::update_question_handler)
                .delete(handlers::questions::delete_question_handler),
        );

    let account_routes = Router::new()
        .route(
            "/api/accounts",
            post(handlers::accounts::create_account_handler),
        )
        .route(
            "/api/accounts/{username}",
            delete(handlers::accounts::delete_account_handler),
        )
        .route(
            "/api/accounts/{username}/permissions/{permission}",
            put(handlers::accounts::grant_permission_handler)
                .delete(handlers::accounts::revoke_permission_handler),
        );

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(question_routes)
        .merge(account_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::enforce_site_gate,
        ))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::attach_identity,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
