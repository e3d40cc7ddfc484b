//! Booking model for storage and API.

use serde::{Deserialize, Serialize};

/// State of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// A passenger's reservation of seats on a ride.
///
/// References the ride by id only; a booking may outlive its ride
/// (ride deletion does not cascade).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Monotonically increasing id, independent of ride ids
    pub id: u64,
    pub ride_id: u64,
    pub passenger_id: String,
    pub seats_booked: u32,
    pub booking_status: BookingStatus,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Fields supplied when creating a booking; id, status, and created_at
/// are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub ride_id: u64,
    pub passenger_id: String,
    pub seats_booked: u32,
}
