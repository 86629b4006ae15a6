pub mod auth_service;
pub mod auth_service_impl;
pub mod booking_service;
pub mod booking_service_impl;
pub mod stats;
pub mod token_service;

pub use auth_service::{AuthError, AuthService, LoginResult, ProfileUpdate};
pub use auth_service_impl::MemoryAuthService;
pub use booking_service::{BookingError, BookingService};
pub use booking_service_impl::MemoryBookingService;
pub use stats::{BookingStats, StatsService};
pub use token_service::{Claims, TokenError, TokenService};
