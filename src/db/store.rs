// SPDX-License-Identifier: MIT

//! The application data store.
//!
//! Sole authority over persisted state: three tables (rides, bookings,
//! users) plus two id counters, held in memory and mirrored to
//! [`LocalStorage`] on every write. Construct one per process and share it
//! through `AppState`; tests construct their own isolated instances.
//!
//! Contract notes:
//! - Every query returns owned clones, never references into the tables,
//!   so callers cannot alias store state.
//! - Write operations signal failure by returning `None`/`false` rather
//!   than an error; the HTTP layer decides how to report that.
//! - [`DataStore::create_booking`] runs its seat check and its commit
//!   under the same lock, so the check-then-act is atomic against
//!   concurrent callers of this instance.

use crate::db::{keys, LocalStorage};
use crate::models::{
    Booking, BookingStatus, NewBooking, NewRide, NewUser, Ride, RideStatus, RideUpdate, User,
    UserRole,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use subtle::ConstantTimeEq;

/// Version tag for the persisted layout.
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug)]
struct Inner {
    rides: Vec<Ride>,
    bookings: Vec<Booking>,
    users: Vec<User>,
    next_ride_id: u64,
    next_booking_id: u64,
    initialized: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            rides: Vec::new(),
            bookings: Vec::new(),
            users: Vec::new(),
            next_ride_id: 1,
            next_booking_id: 1,
            initialized: false,
        }
    }
}

/// In-memory table set mirrored to local storage.
#[derive(Debug)]
pub struct DataStore {
    storage: LocalStorage,
    inner: Mutex<Inner>,
}

impl DataStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Store persisting under `root`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(LocalStorage::open(root))
    }

    /// In-memory store that never persists (detached storage).
    pub fn detached() -> Self {
        Self::new(LocalStorage::detached())
    }

    /// Lock the tables, loading them from storage first if that has not
    /// happened yet. The load is skipped while the storage is detached,
    /// leaving the store as empty in-memory state.
    fn lock_init(&self) -> MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !inner.initialized && !self.storage.is_detached() {
            self.load(&mut inner);
            inner.initialized = true;
        }
        inner
    }

    fn load(&self, inner: &mut Inner) {
        match self.storage.get::<Vec<Ride>>(keys::RIDES) {
            Some(rides) => inner.rides = rides,
            None => self.storage.set(keys::RIDES, &inner.rides),
        }
        match self.storage.get::<Vec<Booking>>(keys::BOOKINGS) {
            Some(bookings) => inner.bookings = bookings,
            None => self.storage.set(keys::BOOKINGS, &inner.bookings),
        }
        match self.storage.get::<Vec<User>>(keys::USERS) {
            Some(users) => inner.users = users,
            None => self.storage.set(keys::USERS, &inner.users),
        }

        // Counters reseed from max(id) + 1 when their key is missing but
        // a table is present (e.g. state written by an older layout).
        inner.next_ride_id = match self.storage.get::<u64>(keys::NEXT_RIDE_ID) {
            Some(next) => next,
            None => {
                let next = inner.rides.iter().map(|r| r.id).max().map_or(1, |m| m + 1);
                self.storage.set(keys::NEXT_RIDE_ID, &next);
                next
            }
        };
        inner.next_booking_id = match self.storage.get::<u64>(keys::NEXT_BOOKING_ID) {
            Some(next) => next,
            None => {
                let next = inner
                    .bookings
                    .iter()
                    .map(|b| b.id)
                    .max()
                    .map_or(1, |m| m + 1);
                self.storage.set(keys::NEXT_BOOKING_ID, &next);
                next
            }
        };

        if self.storage.get::<u32>(keys::SCHEMA_VERSION).is_none() {
            self.storage.set(keys::SCHEMA_VERSION, &SCHEMA_VERSION);
        }

        tracing::debug!(
            rides = inner.rides.len(),
            bookings = inner.bookings.len(),
            users = inner.users.len(),
            "Data store loaded"
        );
    }

    fn save_rides(&self, inner: &Inner) {
        self.storage.set(keys::RIDES, &inner.rides);
        self.storage.set(keys::NEXT_RIDE_ID, &inner.next_ride_id);
    }

    fn save_bookings(&self, inner: &Inner) {
        self.storage.set(keys::BOOKINGS, &inner.bookings);
        self.storage
            .set(keys::NEXT_BOOKING_ID, &inner.next_booking_id);
    }

    fn save_users(&self, inner: &Inner) {
        self.storage.set(keys::USERS, &inner.users);
    }

    fn now_rfc3339() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a user. Returns `None` if a user with the same
    /// `(email, user_type)` already exists.
    pub fn create_user(&self, user: NewUser) -> Option<User> {
        let mut inner = self.lock_init();
        if inner
            .users
            .iter()
            .any(|u| u.email == user.email && u.user_type == user.user_type)
        {
            return None; // user already exists
        }

        // Ids are "{role}-{millis}"; bump the millis until unused in case
        // two signups land on the same millisecond.
        let mut millis = chrono::Utc::now().timestamp_millis();
        let id = loop {
            let candidate = format!("{}-{}", user.user_type, millis);
            if !inner.users.iter().any(|u| u.id == candidate) {
                break candidate;
            }
            millis += 1;
        };

        let record = User {
            id,
            user_type: user.user_type,
            name: user.name,
            email: user.email,
            password: user.password,
            mobile: user.mobile,
        };
        inner.users.push(record.clone());
        self.save_users(&inner);
        Some(record)
    }

    pub fn get_user_by_email_and_type(&self, email: &str, user_type: UserRole) -> Option<User> {
        let inner = self.lock_init();
        inner
            .users
            .iter()
            .find(|u| u.email == email && u.user_type == user_type)
            .cloned()
    }

    pub fn get_user_by_id(&self, id: &str) -> Option<User> {
        let inner = self.lock_init();
        inner.users.iter().find(|u| u.id == id).cloned()
    }

    /// Check a password for an existing `(email, user_type)`.
    ///
    /// Plaintext comparison by design (demo scope), but constant-time to
    /// avoid leaking prefix length.
    pub fn validate_user_password(&self, email: &str, password: &str, user_type: UserRole) -> bool {
        let inner = self.lock_init();
        let Some(user) = inner
            .users
            .iter()
            .find(|u| u.email == email && u.user_type == user_type)
        else {
            return false;
        };
        user.password.as_bytes().ct_eq(password.as_bytes()).into()
    }

    // ─── Ride Operations ─────────────────────────────────────────

    /// Create a ride with the next ride id, status `Upcoming`, and the
    /// current timestamp.
    pub fn create_ride(&self, data: NewRide) -> Ride {
        let mut inner = self.lock_init();
        let id = inner.next_ride_id;
        inner.next_ride_id += 1;

        let ride = Ride {
            id,
            origin: data.origin,
            destination: data.destination,
            departure_date: data.departure_date,
            departure_time: data.departure_time,
            available_seats: data.available_seats,
            price_per_seat: data.price_per_seat,
            status: RideStatus::Upcoming,
            driver_id: data.driver_id,
            driver_name: data.driver_name,
            driver_avatar_url: data.driver_avatar_url,
            created_at: Self::now_rfc3339(),
        };
        inner.rides.push(ride.clone());
        self.save_rides(&inner);
        ride
    }

    /// Merge the supplied fields into the matching ride. Returns `None`
    /// if the id is unknown; unspecified fields keep their prior values.
    pub fn update_ride(&self, id: u64, update: RideUpdate) -> Option<Ride> {
        let mut inner = self.lock_init();
        let ride = inner.rides.iter_mut().find(|r| r.id == id)?;

        if let Some(origin) = update.origin {
            ride.origin = origin;
        }
        if let Some(destination) = update.destination {
            ride.destination = destination;
        }
        if let Some(departure_date) = update.departure_date {
            ride.departure_date = departure_date;
        }
        if let Some(departure_time) = update.departure_time {
            ride.departure_time = departure_time;
        }
        if let Some(available_seats) = update.available_seats {
            ride.available_seats = available_seats;
        }
        if let Some(price_per_seat) = update.price_per_seat {
            ride.price_per_seat = price_per_seat;
        }
        if let Some(status) = update.status {
            ride.status = status;
        }

        let updated = ride.clone();
        self.save_rides(&inner);
        Some(updated)
    }

    /// Remove a ride by id. Dependent bookings are left in place
    /// ("soft history"); callers must tolerate bookings whose ride is
    /// gone.
    pub fn delete_ride(&self, id: u64) -> bool {
        let mut inner = self.lock_init();
        let Some(idx) = inner.rides.iter().position(|r| r.id == id) else {
            return false;
        };
        inner.rides.remove(idx);
        self.save_rides(&inner);
        true
    }

    pub fn get_rides(&self) -> Vec<Ride> {
        self.lock_init().rides.clone()
    }

    pub fn get_ride_by_id(&self, id: u64) -> Option<Ride> {
        let inner = self.lock_init();
        inner.rides.iter().find(|r| r.id == id).cloned()
    }

    pub fn get_rides_by_driver_id(&self, driver_id: &str) -> Vec<Ride> {
        let inner = self.lock_init();
        inner
            .rides
            .iter()
            .filter(|r| r.driver_id == driver_id)
            .cloned()
            .collect()
    }

    /// Seats still bookable on a ride: capacity minus the sum of
    /// confirmed bookings. Computed on demand, never stored.
    pub fn remaining_seats(&self, ride_id: u64) -> Option<u32> {
        let inner = self.lock_init();
        let ride = inner.rides.iter().find(|r| r.id == ride_id)?;
        Some(ride.available_seats.saturating_sub(booked_seats(&inner, ride_id)))
    }

    // ─── Booking Operations ──────────────────────────────────────

    /// Book seats on a ride.
    ///
    /// Returns `None` when the ride does not exist or when fewer than
    /// `seats_booked` seats remain. The seat check and the append run
    /// under one lock together with the persistence write.
    pub fn create_booking(&self, data: NewBooking) -> Option<Booking> {
        let mut inner = self.lock_init();
        let ride = inner.rides.iter().find(|r| r.id == data.ride_id)?;

        let remaining = ride
            .available_seats
            .saturating_sub(booked_seats(&inner, data.ride_id));
        if remaining < data.seats_booked {
            return None; // not enough seats
        }

        let id = inner.next_booking_id;
        inner.next_booking_id += 1;

        let booking = Booking {
            id,
            ride_id: data.ride_id,
            passenger_id: data.passenger_id,
            seats_booked: data.seats_booked,
            booking_status: BookingStatus::Confirmed,
            created_at: Self::now_rfc3339(),
        };
        inner.bookings.push(booking.clone());
        self.save_bookings(&inner);
        Some(booking)
    }

    pub fn get_bookings(&self) -> Vec<Booking> {
        self.lock_init().bookings.clone()
    }

    pub fn get_bookings_by_passenger_id(&self, passenger_id: &str) -> Vec<Booking> {
        let inner = self.lock_init();
        inner
            .bookings
            .iter()
            .filter(|b| b.passenger_id == passenger_id)
            .cloned()
            .collect()
    }

    pub fn get_bookings_for_ride(&self, ride_id: u64) -> Vec<Booking> {
        let inner = self.lock_init();
        inner
            .bookings
            .iter()
            .filter(|b| b.ride_id == ride_id)
            .cloned()
            .collect()
    }
}

/// Sum of confirmed seats booked against a ride.
fn booked_seats(inner: &Inner, ride_id: u64) -> u32 {
    inner
        .bookings
        .iter()
        .filter(|b| b.ride_id == ride_id && b.booking_status == BookingStatus::Confirmed)
        .map(|b| b.seats_booked)
        .sum()
}
