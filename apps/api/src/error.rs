use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forum_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-code.ts"
)]
pub enum ErrorCode {
    /// Malformed input or an undeclared field.
    Validation,
    /// Missing, or outside the caller's view rows.
    NotFound,
    /// Clashes with stored state.
    Conflict,
    /// Unknown or inactive identity.
    Unauthorized,
    /// Visible but not permitted.
    Forbidden,
    /// Storage or permission-source failure.
    Internal,
}

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    code: ErrorCode,
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn classify(&self) -> (StatusCode, ErrorCode) {
        match self.0 {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::Validation),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        // Storage details stay in the log.
        let message = match &self.0 {
            AppError::Internal(detail) => {
                error!(detail = %detail, "request failed");
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { code, message })).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use forum_core::AppError;
    use serde_json::{Value, json};

    use super::ApiError;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = ApiError::from(error).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|_| unreachable!());
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| unreachable!());
        (status, body)
    }

    #[tokio::test]
    async fn categories_map_to_status_and_code() {
        let (status, body) = render(AppError::Forbidden("no".to_owned())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], json!("forbidden"));
        assert_eq!(body["message"], json!("forbidden: no"));

        let (status, body) = render(AppError::NotFound("question 'x' not found".to_owned())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], json!("not_found"));
    }

    #[tokio::test]
    async fn internal_details_are_not_returned() {
        let (status, body) =
            render(AppError::Internal("connection refused on 10.0.0.5".to_owned())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], json!("internal"));
        assert_eq!(body["message"], json!("internal server error"));
    }
}
