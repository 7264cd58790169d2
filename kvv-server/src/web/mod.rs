//! Web layer for the departures gateway.
//!
//! Provides HTTP endpoints for stop search and live departures.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
