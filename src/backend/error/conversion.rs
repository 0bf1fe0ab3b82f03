/**
 * Error Conversion
 *
 * This module converts `AuthError` into an HTTP response so handlers and
 * middleware can return it directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Unauthorized",
 *   "status": 401
 * }
 * ```
 */

use axum::response::{IntoResponse, Json, Response};
use crate::backend::error::types::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AuthError::Internal(detail) = &self {
            tracing::error!("Request failed: {}", detail);
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_unauthorized_response_body() {
        let response = AuthError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_internal_response_hides_detail() {
        let response = AuthError::internal("pool exhausted").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("pool exhausted"));
    }
}
