//! Ride model for storage and API.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideStatus {
    Upcoming,
    Completed,
    Cancelled,
}

/// A driver-offered trip.
///
/// `available_seats` is the capacity configured at creation and is never
/// decremented; remaining seats are computed on read from confirmed
/// bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    /// Monotonically increasing id, assigned by the store, never reused
    pub id: u64,
    pub origin: String,
    pub destination: String,
    /// Departure date (YYYY-MM-DD)
    pub departure_date: String,
    /// Departure time (HH:MM)
    pub departure_time: String,
    /// Seat capacity configured by the driver
    pub available_seats: u32,
    pub price_per_seat: f64,
    pub status: RideStatus,
    /// Id of the offering driver
    pub driver_id: String,
    pub driver_name: String,
    pub driver_avatar_url: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Fields supplied when creating a ride; id, status, and created_at are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRide {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
    pub available_seats: u32,
    pub price_per_seat: f64,
    pub driver_id: String,
    pub driver_name: String,
    pub driver_avatar_url: String,
}

/// Partial update for a ride; only supplied fields are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RideUpdate {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub available_seats: Option<u32>,
    pub price_per_seat: Option<f64>,
    pub status: Option<RideStatus>,
}
