//! Data models shared by the store and the API.

pub mod booking;
pub mod ride;
pub mod user;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use ride::{NewRide, Ride, RideStatus, RideUpdate};
pub use user::{NewUser, Profile, User, UserRole};
