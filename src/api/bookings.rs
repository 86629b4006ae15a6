use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{json_body, require_fields};
use super::{
    ApiError, AppState, BookingResponse, BookingsResponse, CreateBookingRequest, SuccessResponse,
    UpdateBookingRequest,
};
use crate::services::{BookingError, Claims};

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(id) => Self::not_found("Booking", id),
            BookingError::InvalidStatus(msg) => Self::validation(msg),
        }
    }
}

/// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, ApiError> {
    let payload = json_body(payload)?;
    require_fields(&[
        ("date", payload.date.as_str()),
        ("time", payload.time.as_str()),
    ])?;

    let booking = state
        .booking_service
        .create(
            &claims,
            payload.date.trim(),
            payload.time.trim(),
            &payload.notes,
        )
        .await;

    Ok(Json(BookingResponse { booking }))
}

/// GET /bookings/my
pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Json<BookingsResponse> {
    Json(BookingsResponse {
        bookings: state.booking_service.list_mine(&claims.id).await,
    })
}

/// DELETE /bookings/{id}
/// Only the owner may delete. Someone else's booking reads as not found.
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.booking_service.delete(&id, &claims.id).await?;
    Ok(Json(SuccessResponse::OK))
}

/// GET /bookings (admin)
pub async fn list_all_bookings(State(state): State<Arc<AppState>>) -> Json<BookingsResponse> {
    Json(BookingsResponse {
        bookings: state.booking_service.list_all().await,
    })
}

/// PUT /bookings/{id} (admin)
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, ApiError> {
    let payload = json_body(payload)?;
    require_fields(&[("status", payload.status.as_str())])?;

    let booking = state
        .booking_service
        .set_status(&id, payload.status.trim())
        .await?;

    Ok(Json(BookingResponse { booking }))
}
