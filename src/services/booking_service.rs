//! Domain service for bookings and their ownership rules.

use thiserror::Error;

use crate::models::Booking;
use crate::services::token_service::Claims;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Missing id and someone else's booking are reported identically.
    #[error("Booking {0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidStatus(String),
}

#[async_trait::async_trait]
pub trait BookingService: Send + Sync {
    /// Creates a pending booking owned by the caller, copying their name and email.
    async fn create(&self, owner: &Claims, date: &str, time: &str, notes: &str) -> Booking;

    /// The caller's bookings in creation order.
    async fn list_mine(&self, owner_id: &str) -> Vec<Booking>;

    async fn list_all(&self) -> Vec<Booking>;

    /// Deletes a booking owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] if the booking is missing or not owned by the caller.
    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), BookingError>;

    /// Sets the status to one of `pending`, `approved` or `rejected`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStatus`] for any other value.
    async fn set_status(&self, id: &str, status: &str) -> Result<Booking, BookingError>;
}
