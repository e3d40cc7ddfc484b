//! Data layer: local key/value persistence and the application store.

pub mod storage;
pub mod store;

pub use storage::LocalStorage;
pub use store::DataStore;

/// Storage keys as constants.
pub mod keys {
    pub const RIDES: &str = "rides";
    pub const BOOKINGS: &str = "bookings";
    pub const USERS: &str = "users";
    pub const NEXT_RIDE_ID: &str = "nextRideId";
    pub const NEXT_BOOKING_ID: &str = "nextBookingId";
    /// Layout version tag, written alongside the tables
    pub const SCHEMA_VERSION: &str = "schemaVersion";
}
