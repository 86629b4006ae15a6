//! Process-memory tables for accounts and bookings.
//!
//! Nothing here is persisted: a restart starts from empty tables. Each table sits
//! behind its own `RwLock`, and every check-then-insert runs under one write guard.

use thiserror::Error;

use crate::config::SecurityConfig;

pub mod repositories;

pub use repositories::booking::{BookingRepository, NewBooking};
pub use repositories::user::{NewUser, UserRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("An admin account already exists")]
    AdminExists,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct Store {
    users: UserRepository,
    bookings: BookingRepository,
}

impl Store {
    #[must_use]
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            users: UserRepository::new(security),
            bookings: BookingRepository::new(),
        }
    }

    #[must_use]
    pub const fn users(&self) -> &UserRepository {
        &self.users
    }

    #[must_use]
    pub const fn bookings(&self) -> &BookingRepository {
        &self.bookings
    }
}
