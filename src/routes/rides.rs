// SPDX-License-Identifier: MIT

//! Ride CRUD routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{NewRide, Ride, RideUpdate, UserRole};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rides", get(list_rides).post(create_ride))
        .route(
            "/api/rides/{id}",
            get(get_ride).put(update_ride).delete(delete_ride),
        )
        .route("/api/my-rides", get(my_rides))
}

/// Ride as returned by the API, with the remaining seat count computed
/// from confirmed bookings.
#[derive(Serialize)]
pub struct RideResponse {
    #[serde(flatten)]
    pub ride: Ride,
    pub remaining_seats: u32,
}

fn to_response(state: &AppState, ride: Ride) -> RideResponse {
    let remaining_seats = state.store.remaining_seats(ride.id).unwrap_or_default();
    RideResponse {
        ride,
        remaining_seats,
    }
}

// ─── Queries ─────────────────────────────────────────────────

/// List all rides.
async fn list_rides(State(state): State<Arc<AppState>>) -> Json<Vec<RideResponse>> {
    let rides = state
        .store
        .get_rides()
        .into_iter()
        .map(|ride| to_response(&state, ride))
        .collect();
    Json(rides)
}

/// Get one ride by id.
async fn get_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<RideResponse>> {
    let ride = state
        .store
        .get_ride_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Ride {id} not found")))?;
    Ok(Json(to_response(&state, ride)))
}

/// Rides offered by the authenticated driver.
async fn my_rides(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<RideResponse>> {
    let rides = state
        .store
        .get_rides_by_driver_id(&user.user_id)
        .into_iter()
        .map(|ride| to_response(&state, ride))
        .collect();
    Json(rides)
}

// ─── Create ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateRideRequest {
    #[validate(length(min = 1, max = 200))]
    pub origin: String,
    #[validate(length(min = 1, max = 200))]
    pub destination: String,
    #[validate(length(min = 1, max = 32))]
    pub departure_date: String,
    #[validate(length(min = 1, max = 32))]
    pub departure_time: String,
    #[validate(range(min = 1))]
    pub available_seats: u32,
    #[validate(range(min = 0.0))]
    pub price_per_seat: f64,
    #[serde(default)]
    pub driver_avatar_url: String,
}

/// Publish a new ride. Drivers only; the driver identity comes from the
/// session, not the request body.
async fn create_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateRideRequest>,
) -> Result<Json<RideResponse>> {
    if user.role != UserRole::Driver {
        return Err(AppError::Forbidden("Only drivers can offer rides".to_string()));
    }
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let driver = state
        .store
        .get_user_by_id(&user.user_id)
        .ok_or(AppError::Unauthorized)?;

    let ride = state.store.create_ride(NewRide {
        origin: req.origin,
        destination: req.destination,
        departure_date: req.departure_date,
        departure_time: req.departure_time,
        available_seats: req.available_seats,
        price_per_seat: req.price_per_seat,
        driver_id: driver.id,
        driver_name: driver.name,
        driver_avatar_url: req.driver_avatar_url,
    });

    tracing::info!(ride_id = ride.id, driver_id = %ride.driver_id, "Ride created");

    Ok(Json(to_response(&state, ride)))
}

// ─── Update / Delete ─────────────────────────────────────────

/// Merge supplied fields into an existing ride. Owner only.
async fn update_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
    Json(update): Json<RideUpdate>,
) -> Result<Json<RideResponse>> {
    let ride = state
        .store
        .get_ride_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Ride {id} not found")))?;
    if ride.driver_id != user.user_id {
        return Err(AppError::Forbidden("Not your ride".to_string()));
    }

    let updated = state
        .store
        .update_ride(id, update)
        .ok_or_else(|| AppError::NotFound(format!("Ride {id} not found")))?;

    Ok(Json(to_response(&state, updated)))
}

#[derive(Serialize)]
pub struct DeleteRideResponse {
    pub success: bool,
}

/// Delete a ride. Owner only. Bookings against the ride are left in
/// place as history.
async fn delete_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteRideResponse>> {
    let ride = state
        .store
        .get_ride_by_id(id)
        .ok_or_else(|| AppError::NotFound(format!("Ride {id} not found")))?;
    if ride.driver_id != user.user_id {
        return Err(AppError::Forbidden("Not your ride".to_string()));
    }

    if !state.store.delete_ride(id) {
        return Err(AppError::NotFound(format!("Ride {id} not found")));
    }

    tracing::info!(ride_id = id, driver_id = %user.user_id, "Ride deleted");

    Ok(Json(DeleteRideResponse { success: true }))
}
