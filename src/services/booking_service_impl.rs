//! In-memory implementation of the `BookingService` trait.

use async_trait::async_trait;

use crate::models::{Booking, BookingStatus};
use crate::services::booking_service::{BookingError, BookingService};
use crate::services::token_service::Claims;
use crate::store::{NewBooking, Store};

pub struct MemoryBookingService {
    store: Store,
}

impl MemoryBookingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookingService for MemoryBookingService {
    async fn create(&self, owner: &Claims, date: &str, time: &str, notes: &str) -> Booking {
        let booking = self
            .store
            .bookings()
            .create(NewBooking {
                user_id: owner.id.clone(),
                user_name: owner.name.clone(),
                user_email: owner.email.clone(),
                date: date.to_string(),
                time: time.to_string(),
                notes: notes.to_string(),
            })
            .await;

        tracing::info!(booking_id = %booking.id, user_id = %owner.id, "Booking created");
        booking
    }

    async fn list_mine(&self, owner_id: &str) -> Vec<Booking> {
        self.store.bookings().list_for_owner(owner_id).await
    }

    async fn list_all(&self) -> Vec<Booking> {
        self.store.bookings().list_all().await
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), BookingError> {
        if !self.store.bookings().delete_owned(id, owner_id).await {
            return Err(BookingError::NotFound(id.to_string()));
        }

        tracing::info!(booking_id = %id, user_id = %owner_id, "Booking deleted");
        Ok(())
    }

    async fn set_status(&self, id: &str, status: &str) -> Result<Booking, BookingError> {
        let status: BookingStatus = status.parse().map_err(BookingError::InvalidStatus)?;

        let booking = self
            .store
            .bookings()
            .set_status(id, status)
            .await
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        tracing::info!(booking_id = %id, status = %status, "Booking status changed");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::models::Role;

    fn claims(id: &str, name: &str) -> Claims {
        Claims {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: name.to_string(),
            role: Role::User,
            iat: 0,
            exp: 0,
        }
    }

    fn service() -> MemoryBookingService {
        MemoryBookingService::new(Store::new(SecurityConfig::default()))
    }

    #[tokio::test]
    async fn test_create_snapshots_owner() {
        let bookings = service();
        let booking = bookings
            .create(&claims("u1", "Ann"), "2026-03-01", "09:30", "window seat")
            .await;

        assert_eq!(booking.user_id, "u1");
        assert_eq!(booking.user_name, "Ann");
        assert_eq!(booking.user_email, "u1@example.com");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.notes, "window seat");
    }

    #[tokio::test]
    async fn test_delete_not_owner_matches_missing() {
        let bookings = service();
        let booking = bookings.create(&claims("u1", "Ann"), "d", "t", "").await;

        let not_owner = bookings.delete(&booking.id, "u2").await.unwrap_err();
        let missing = bookings.delete("no-such-id", "u2").await.unwrap_err();

        assert!(matches!(not_owner, BookingError::NotFound(_)));
        assert!(matches!(missing, BookingError::NotFound(_)));
        assert_eq!(bookings.list_mine("u1").await.len(), 1);
    }

    #[tokio::test]
    async fn test_set_status_validates() {
        let bookings = service();
        let booking = bookings.create(&claims("u1", "Ann"), "d", "t", "").await;

        let err = bookings.set_status(&booking.id, "cancelled").await;
        assert!(matches!(err, Err(BookingError::InvalidStatus(_))));

        let updated = bookings.set_status(&booking.id, "rejected").await.unwrap();
        assert_eq!(updated.status, BookingStatus::Rejected);

        assert!(matches!(
            bookings.set_status("missing", "approved").await,
            Err(BookingError::NotFound(_))
        ));
    }
}
