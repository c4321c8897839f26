// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::storage::{LedgerError, StorageError};

/// Error returned by handlers, rendered as
/// `{ "success": false, "message": ..., "error"?: ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Underlying cause, exposed as `error`
    pub detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 with a caller-facing summary and the underlying error as detail.
    pub fn internal(message: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Map a storage error, using `context` as the message for failures
    /// the client cannot act on.
    pub fn storage(err: StorageError, context: &str) -> Self {
        match err {
            StorageError::NotFound(what) => Self::not_found(format!("{what} not found")),
            StorageError::AlreadyExists(what) => {
                Self::bad_request(format!("{what} already exists"))
            }
            StorageError::PermissionDenied { .. } => {
                Self::forbidden("Not authorized to access this route")
            }
            other => {
                tracing::error!(error = %other, "{context}");
                Self::internal(context, other)
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::storage(err, "Internal server error")
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Storage(e) => Self::storage(e, "Unable to process investment"),
            LedgerError::MissingAmount => {
                Self::bad_request("Please provide tokens amount and investment amount")
            }
            LedgerError::NegativeAmount => {
                Self::bad_request("Tokens amount and investment amount must be positive")
            }
            LedgerError::FractionalTokens => {
                Self::bad_request("Tokens amount must be a whole number")
            }
            LedgerError::Overflow => Self::bad_request("Investment total is too large"),
            LedgerError::NotActive => {
                Self::bad_request("This asset is not available for investment")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.status_code(), err.public_message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_detail(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query parameters").with_detail(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
            error: self.detail,
        });
        (self.status, body).into_response()
    }
}

/// JSON body extractor whose rejection is an [`ApiError`] envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejection is an [`ApiError`] envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, body::Body, http::Request};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        assert_eq!(ApiError::bad_request("bad").status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("who").status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("no").status, StatusCode::FORBIDDEN);

        let internal = ApiError::internal("Unable to fetch assets", "disk on fire");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.detail.as_deref(), Some("disk on fire"));
    }

    #[tokio::test]
    async fn into_response_returns_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"success": false, "message": "bad data"}));
    }

    #[tokio::test]
    async fn internal_error_exposes_detail() {
        let body = body_json(ApiError::internal("Unable to login", "boom").into_response()).await;
        assert_eq!(body["error"], "boom");
        assert_eq!(body["message"], "Unable to login");
    }

    #[test]
    fn storage_errors_map_to_statuses() {
        let nf = ApiError::from(StorageError::NotFound("User u1".into()));
        assert_eq!(nf.status, StatusCode::NOT_FOUND);

        let dup = ApiError::from(StorageError::AlreadyExists("User x".into()));
        assert_eq!(dup.status, StatusCode::BAD_REQUEST);

        let denied = ApiError::from(StorageError::PermissionDenied {
            user_id: "u".into(),
            resource: "asset a".into(),
        });
        assert_eq!(denied.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn ledger_errors_map_to_client_messages() {
        let missing = ApiError::from(LedgerError::MissingAmount);
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            missing.message,
            "Please provide tokens amount and investment amount"
        );

        let inactive = ApiError::from(LedgerError::NotActive);
        assert_eq!(inactive.message, "This asset is not available for investment");
    }

    #[test]
    fn auth_errors_keep_status() {
        let err = ApiError::from(AuthError::TokenExpired);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Authentication invalid");
    }

    #[tokio::test]
    async fn malformed_json_becomes_bad_request_envelope() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let result = ApiJson::<serde_json::Value>::from_request(request, &()).await;
        let err = result.expect_err("malformed body should be rejected");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid request body");
        assert!(err.detail.is_some());
    }

    #[tokio::test]
    async fn query_rejection_becomes_envelope() {
        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            page: Option<String>,
        }

        let request = Request::builder()
            .uri("/assets?page=1&page=2")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let err = ApiQuery::<Params>::from_request_parts(&mut parts, &())
            .await
            .expect_err("duplicate field should be rejected");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid query parameters");

        let body = body_json(err.into_response()).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("page"));
    }
}
