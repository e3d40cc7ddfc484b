// SPDX-License-Identifier: MIT

//! Booking endpoint tests, including the full seat-exhaustion scenario
//! and orphaned-booking handling after ride deletion.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use ridelink::models::{NewRide, UserRole};
use serde_json::json;
use tower::ServiceExt;

mod common;

/// Seed a ride directly in the store, owned by `driver_id`.
fn seed_ride(state: &ridelink::AppState, driver_id: &str, seats: u32) -> u64 {
    state
        .store
        .create_ride(NewRide {
            origin: "Accra".to_string(),
            destination: "Kumasi".to_string(),
            departure_date: "2026-09-01".to_string(),
            departure_time: "08:30".to_string(),
            available_seats: seats,
            price_per_seat: 25.0,
            driver_id: driver_id.to_string(),
            driver_name: "Ama".to_string(),
            driver_avatar_url: String::new(),
        })
        .id
}

#[tokio::test]
async fn test_seat_exhaustion_scenario() {
    let (app, state) = common::create_test_app();
    let (driver, _) = common::seed_user(&state, UserRole::Driver, "ama@example.com");
    let (_, token_a) = common::seed_user(&state, UserRole::Passenger, "kofi@example.com");
    let (_, token_b) = common::seed_user(&state, UserRole::Passenger, "esi@example.com");
    let ride_id = seed_ride(&state, &driver.id, 3);

    // A books 2 of 3 seats
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token_a),
            &json!({"ride_id": ride_id, "seats_booked": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["booking_status"], "Confirmed");

    // B wants 2, only 1 remains
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token_b),
            &json!({"ride_id": ride_id, "seats_booked": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // B takes the last seat
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token_b),
            &json!({"ride_id": ride_id, "seats_booked": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Ride is now full
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token_b),
            &json!({"ride_id": ride_id, "seats_booked": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Listing reflects zero remaining seats, capacity untouched
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/rides/{ride_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token_a}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["available_seats"], 3);
    assert_eq!(body["remaining_seats"], 0);
}

#[tokio::test]
async fn test_booking_unknown_ride() {
    let (app, state) = common::create_test_app();
    let (_, token) = common::seed_user(&state, UserRole::Passenger, "kofi@example.com");

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token),
            &json!({"ride_id": 99, "seats_booked": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_driver_cannot_book() {
    let (app, state) = common::create_test_app();
    let (driver, token) = common::seed_user(&state, UserRole::Driver, "ama@example.com");
    let ride_id = seed_ride(&state, &driver.id, 3);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token),
            &json!({"ride_id": ride_id, "seats_booked": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_booking_rejects_zero_seats() {
    let (app, state) = common::create_test_app();
    let (driver, _) = common::seed_user(&state, UserRole::Driver, "ama@example.com");
    let (_, token) = common::seed_user(&state, UserRole::Passenger, "kofi@example.com");
    let ride_id = seed_ride(&state, &driver.id, 3);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&token),
            &json!({"ride_id": ride_id, "seats_booked": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_bookings_tolerates_deleted_ride() {
    let (app, state) = common::create_test_app();
    let (driver, _) = common::seed_user(&state, UserRole::Driver, "ama@example.com");
    let (_, token) = common::seed_user(&state, UserRole::Passenger, "kofi@example.com");
    let kept = seed_ride(&state, &driver.id, 3);
    let doomed = seed_ride(&state, &driver.id, 3);

    for ride_id in [kept, doomed] {
        let response = app
            .clone()
            .oneshot(common::json_request(
                "POST",
                "/api/bookings",
                Some(&token),
                &json!({"ride_id": ride_id, "seats_booked": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Ride deletion does not cascade to bookings
    assert!(state.store.delete_ride(doomed));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/my-bookings")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let bookings = body.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(bookings.iter().any(|b| b["ride"].is_object()));
    // The orphaned booking is still listed, just without its ride
    assert!(bookings.iter().any(|b| b.get("ride").is_none()));
}

#[tokio::test]
async fn test_ride_bookings_owner_only() {
    let (app, state) = common::create_test_app();
    let (driver, driver_token) = common::seed_user(&state, UserRole::Driver, "ama@example.com");
    let (_, other_token) = common::seed_user(&state, UserRole::Driver, "yaw@example.com");
    let (_, passenger_token) = common::seed_user(&state, UserRole::Passenger, "kofi@example.com");
    let ride_id = seed_ride(&state, &driver.id, 3);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/bookings",
            Some(&passenger_token),
            &json!({"ride_id": ride_id, "seats_booked": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another driver may not list the bookings
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/rides/{ride_id}/bookings"))
                .header(header::AUTHORIZATION, format!("Bearer {other_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The offering driver may
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/rides/{ride_id}/bookings"))
                .header(header::AUTHORIZATION, format!("Bearer {driver_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["seats_booked"], 2);
}
