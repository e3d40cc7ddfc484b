// SPDX-License-Identifier: MIT

//! RideLink: a ride-sharing demo backend.
//!
//! Drivers publish rides, passengers book seats. All application state is
//! owned by [`db::DataStore`], which mirrors its tables to a local
//! key/value persistence layer.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use config::Config;
use db::DataStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: DataStore,
}
