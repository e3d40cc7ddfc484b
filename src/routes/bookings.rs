// SPDX-License-Identifier: MIT

//! Booking routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Booking, NewBooking, Ride, UserRole};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/my-bookings", get(my_bookings))
        .route("/api/rides/{id}/bookings", get(ride_bookings))
}

#[derive(Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub ride_id: u64,
    #[validate(range(min = 1))]
    pub seats_booked: u32,
}

/// Book seats on a ride. Passengers only.
///
/// The store refuses the booking when fewer seats remain than requested;
/// that surfaces as a conflict, while an unknown ride is a not-found.
async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>> {
    if user.role != UserRole::Passenger {
        return Err(AppError::Forbidden(
            "Only passengers can book rides".to_string(),
        ));
    }
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if state.store.get_ride_by_id(req.ride_id).is_none() {
        return Err(AppError::NotFound(format!("Ride {} not found", req.ride_id)));
    }

    let booking = state
        .store
        .create_booking(NewBooking {
            ride_id: req.ride_id,
            passenger_id: user.user_id.clone(),
            seats_booked: req.seats_booked,
        })
        .ok_or_else(|| AppError::Conflict("Not enough seats available".to_string()))?;

    tracing::info!(
        booking_id = booking.id,
        ride_id = booking.ride_id,
        seats = booking.seats_booked,
        "Booking created"
    );

    Ok(Json(booking))
}

/// A booking joined with its ride, if the ride still exists. Deleted
/// rides leave their bookings behind, so `ride` may be absent.
#[derive(Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride: Option<Ride>,
}

/// Bookings made by the authenticated passenger.
async fn my_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<BookingResponse>> {
    let bookings = state
        .store
        .get_bookings_by_passenger_id(&user.user_id)
        .into_iter()
        .map(|booking| {
            let ride = state.store.get_ride_by_id(booking.ride_id);
            BookingResponse { booking, ride }
        })
        .collect();
    Json(bookings)
}

/// Bookings against one ride. Only the offering driver may list them.
async fn ride_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Booking>>> {
    let ride = state
        .store
        .get_ride_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Ride {id} not found")))?;
    if ride.driver_id != user.user_id {
        return Err(AppError::Forbidden("Not your ride".to_string()));
    }
    Ok(Json(state.store.get_bookings_for_ride(id)))
}
