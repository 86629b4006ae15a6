//! Admin-only endpoints. Every route here sits behind `require_admin`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{json_body, validate_role};
use super::{ApiError, AppState, RoleRequest, StatsResponse, UserResponse, UsersResponse};

/// GET /admin/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.stats_service.collect().await,
    })
}

/// GET /admin/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<UsersResponse> {
    Json(UsersResponse {
        users: state.auth_service.list_users().await,
    })
}

/// PUT /admin/users/{id}/role
pub async fn set_user_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let payload = json_body(payload)?;
    let role = validate_role(&payload.role)?;

    let user = state.auth_service.set_role(&id, role).await?;
    Ok(Json(UserResponse { user }))
}
