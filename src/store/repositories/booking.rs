use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Booking, BookingStatus};

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

#[derive(Clone, Default)]
pub struct BookingRepository {
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl BookingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No overlap checking: two bookings for the same slot are both accepted.
    pub async fn create(&self, new_booking: NewBooking) -> Booking {
        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_booking.user_id,
            user_name: new_booking.user_name,
            user_email: new_booking.user_email,
            date: new_booking.date,
            time: new_booking.time,
            notes: new_booking.notes,
            status: BookingStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.bookings.write().await.push(booking.clone());
        booking
    }

    pub async fn list_for_owner(&self, owner_id: &str) -> Vec<Booking> {
        let bookings = self.bookings.read().await;
        bookings
            .iter()
            .filter(|b| b.user_id == owner_id)
            .cloned()
            .collect()
    }

    pub async fn list_all(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }

    /// Removes the booking only if both id and owner match.
    /// Returns `false` for a missing id and for someone else's booking alike.
    pub async fn delete_owned(&self, id: &str, owner_id: &str) -> bool {
        let mut bookings = self.bookings.write().await;
        let Some(index) = bookings
            .iter()
            .position(|b| b.id == id && b.user_id == owner_id)
        else {
            return false;
        };

        bookings.remove(index);
        true
    }

    pub async fn set_status(&self, id: &str, status: BookingStatus) -> Option<Booking> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings.iter_mut().find(|b| b.id == id)?;
        booking.status = status;
        Some(booking.clone())
    }
}
