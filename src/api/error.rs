use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorBody;
use crate::constants::messages;
use crate::services::{AuthError, WalletError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),

    Unauthorized(String),

    Forbidden(String),

    NotFound(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(error_message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                Self::Unauthorized(messages::INVALID_CREDENTIALS.to_string())
            }
            AuthError::InvalidToken => Self::Unauthorized(messages::INVALID_TOKEN.to_string()),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::UserNotFound => Self::NotFound(messages::USER_NOT_FOUND.to_string()),
            // Both lookups below are 400, not 404, to keep the established contract
            WalletError::RecipientNotFound => Self::validation(messages::RECIPIENT_NOT_FOUND),
            WalletError::ItemNotAvailable => Self::validation(messages::ITEM_NOT_AVAILABLE),
            WalletError::InvalidAmount => Self::validation(messages::AMOUNT_NOT_POSITIVE),
            WalletError::InsufficientFundsToSend => Self::validation(messages::NOT_ENOUGH_TO_SEND),
            WalletError::InsufficientFundsToBuy => Self::validation(messages::NOT_ENOUGH_TO_BUY),
            WalletError::Database(msg) => Self::DatabaseError(msg),
            WalletError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn wallet_errors_map_to_contract_statuses() {
        let (status, body) = render(WalletError::RecipientNotFound.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], "Recipient user not found.");

        let (status, body) = render(WalletError::UserNotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"], "User not found.");
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, body) = render(ApiError::DatabaseError("disk I/O error".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"], "A database error occurred");
    }
}
