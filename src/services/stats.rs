use serde::Serialize;

use crate::models::BookingStatus;
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_users: usize,
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub approved_bookings: usize,
    pub rejected_bookings: usize,
}

/// Read-side counters, recomputed on every call.
pub struct StatsService {
    store: Store,
}

impl StatsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn collect(&self) -> BookingStats {
        let total_users = self.store.users().count().await;
        let bookings = self.store.bookings().list_all().await;

        let mut stats = BookingStats {
            total_users,
            total_bookings: bookings.len(),
            ..BookingStats::default()
        };

        for booking in &bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending_bookings += 1,
                BookingStatus::Approved => stats.approved_bookings += 1,
                BookingStatus::Rejected => stats.rejected_bookings += 1,
            }
        }

        stats
    }
}
