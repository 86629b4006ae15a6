use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::validation::{json_body, require_fields, validate_name};
use super::{
    AccountCreatedResponse, ApiError, AppState, CredentialsRequest, HasAdminResponse,
    LoginRequest, ProfileRequest, SessionUserResponse,
};
use crate::services::{AuthError, Claims, LoginResult, ProfileUpdate};

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => Self::EmailTaken,
            AuthError::AdminExists => Self::AdminExists,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::InvalidToken => Self::InvalidToken,
            AuthError::UserNotFound => Self::NotFound("User not found".to_string()),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication guard for `Authorization: Bearer <token>`.
///
/// No header is `NoToken`; anything that fails verification is `InvalidToken`.
/// On success the token's [`Claims`] are attached to the request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let claims = state.auth_service.verify_token(&token)?;

    tracing::Span::current().record("user_id", claims.id.as_str());
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Authorization guard. Must be layered inside [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(ApiError::NoToken)?;

    if !claims.is_admin() {
        tracing::warn!(user_id = %claims.id, "Non-admin denied");
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::NoToken)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::InvalidToken)?;

    Ok(token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /auth/has-admin
pub async fn has_admin(State(state): State<Arc<AppState>>) -> Json<HasAdminResponse> {
    Json(HasAdminResponse {
        has_admin: state.auth_service.has_admin().await,
    })
}

/// POST /auth/init-admin
/// Bootstrap the first admin account. Only succeeds while no admin exists.
pub async fn init_admin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AccountCreatedResponse>, ApiError> {
    let payload = json_body(payload)?;
    require_fields(&[
        ("email", payload.email.as_str()),
        ("password", payload.password.as_str()),
        ("name", payload.name.as_str()),
    ])?;
    let name = validate_name(&payload.name)?;

    let user = state
        .auth_service
        .init_admin(payload.email.trim(), &payload.password, name)
        .await?;

    Ok(Json(AccountCreatedResponse {
        success: true,
        message: "Admin created".to_string(),
        user,
    }))
}

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AccountCreatedResponse>, ApiError> {
    let payload = json_body(payload)?;
    require_fields(&[
        ("email", payload.email.as_str()),
        ("password", payload.password.as_str()),
        ("name", payload.name.as_str()),
    ])?;
    let name = validate_name(&payload.name)?;

    let user = state
        .auth_service
        .register(payload.email.trim(), &payload.password, name)
        .await?;

    Ok(Json(AccountCreatedResponse {
        success: true,
        message: "Registered".to_string(),
        user,
    }))
}

/// POST /auth/login
/// Authenticate with email and password, returns a bearer token on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResult>, ApiError> {
    let payload = json_body(payload)?;
    require_fields(&[
        ("email", payload.email.as_str()),
        ("password", payload.password.as_str()),
    ])?;

    let result = state
        .auth_service
        .login(payload.email.trim(), &payload.password)
        .await?;

    tracing::Span::current().record("user_id", result.user.id.as_str());
    Ok(Json(result))
}

/// GET /auth/me
/// Returns the identity carried by the presented token.
pub async fn me(Extension(claims): Extension<Claims>) -> Json<SessionUserResponse> {
    Json(SessionUserResponse {
        user: claims.into(),
    })
}

/// PUT /auth/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileUpdate>, ApiError> {
    let payload = json_body(payload)?;
    let name = validate_name(&payload.name)?;

    let update = state.auth_service.update_profile(&claims, name).await?;
    Ok(Json(update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert!(matches!(bearer_token(&headers(None)), Err(ApiError::NoToken)));
        assert!(matches!(
            bearer_token(&headers(Some("Basic abc"))),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            bearer_token(&headers(Some("Bearer "))),
            Err(ApiError::InvalidToken)
        ));
        assert_eq!(bearer_token(&headers(Some("Bearer abc.def"))).unwrap(), "abc.def");
    }
}
