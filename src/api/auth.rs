use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::validation::JsonBody;
use super::{ApiError, AppState, LoginRequest, ProfileDto, RegisterRequest, TokenResponse};
use crate::domain::Identity;
use crate::services::{AuthError, Registration};

/// Header carrying the token, as `Bearer <token>` or the bare token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller's bearer token to an [`Identity`] and attaches it to
/// the request extensions. Rejects with 401 before the handler runs when:
/// 1. no token header is present
/// 2. a token header is malformed
/// 3. the token matches no identity
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())?;
    let identity = state.auth_service().authenticate(&token).await?;

    tracing::Span::current().record("user_id", identity.id.as_str());
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Pulls the bearer token from `X-Access-Token` or `Authorization`.
fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(value) = headers.get(ACCESS_TOKEN_HEADER) {
        let raw = value
            .to_str()
            .map_err(|_| AuthError::MalformedHeader("X-Access-Token"))?;
        let token = strip_bearer(raw).unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(AuthError::MalformedHeader("X-Access-Token"));
        }
        return Ok(token.to_string());
    }

    if let Some(value) = headers.get(axum::http::header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(strip_bearer)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedHeader("Authorization"))?;
        return Ok(token.to_string());
    }

    Err(AuthError::MissingToken)
}

/// Strips a `Bearer` scheme, compared case-insensitively per RFC 7235.
fn strip_bearer(raw: &str) -> Option<&str> {
    let (scheme, token) = raw.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileDto>), ApiError> {
    let identity = state
        .auth_service()
        .register(Registration {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileDto::from(identity))))
}

/// POST /auth/login
/// Verifies email and password, returns the caller's access token
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        token: token.into_inner(),
    }))
}

/// GET /auth/me
pub async fn me(Extension(identity): Extension<Identity>) -> Json<ProfileDto> {
    Json(ProfileDto::from(identity))
}
