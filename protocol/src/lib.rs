//! Wire protocol for the event-registration backend
//!
//! - `api`: request/response DTOs bound to specific endpoints
//! - `common`: entities shared across endpoints (users, events, results)

pub mod api;
pub mod common;
