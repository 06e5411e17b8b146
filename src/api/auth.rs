use axum::{
    Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::validation::validate_credentials;
use super::{ApiError, AppState, AuthRequest, TokenResponse};
use crate::services::AuthError;

/// Identity of the caller, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires `Authorization: Bearer <token>` and resolves it to an [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or(AuthError::InvalidToken)?;
    let username = state.shared.auth_service.verify_token(&token)?;

    tracing::Span::current().record("user_id", &username);
    request.extensions_mut().insert(AuthUser { username });

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth
/// Signs in, creating the user on first sight, and returns a bearer token
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Malformed bodies get the same answer as missing fields
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let (username, password) = validate_credentials(payload.username, payload.password)?;

    let token = state
        .shared
        .auth_service
        .authenticate(&username, &password)
        .await
        .inspect_err(|e| {
            if matches!(e, AuthError::InvalidCredentials) {
                tracing::info!(user = %username, "Rejected sign-in with wrong password");
            }
        })?;

    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer abc.def")).as_deref(),
            Some("abc.def")
        );
    }

    #[test]
    fn other_schemes_are_ignored() {
        assert!(extract_bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_none());
        assert!(extract_bearer_token(&headers_with("Bearer ")).is_none());
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());
    }
}
