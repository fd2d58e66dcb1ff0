//! API DTOs module
//!
//! This module contains all API data transfer objects organized by domain:
//! - `auth`: Login, registration and token refresh
//! - `workout`: Workout result management

pub mod auth;
pub mod workout;

pub use auth::*;
pub use workout::*;
