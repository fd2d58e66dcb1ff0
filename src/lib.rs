//! Client library for the event registration and results platform.
//!
//! The heart of the crate is the session lifecycle: token inspection
//! ([`token`]), durable session state ([`session`], [`store`]), the HTTP
//! policy that attaches credentials and recovers from 401s
//! ([`interceptor`]), and route guards ([`guard`]). Typed REST clients for
//! events, categories, workouts and leaderboards live in [`services`].

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod interceptor;
pub mod navigation;
pub mod notify;
pub mod role;
pub mod services;
pub mod session;
pub mod store;
pub mod token;
pub mod transport;
pub mod ui;
pub mod version;

#[cfg(test)]
mod tests;

pub use auth::AuthClient;
pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder, Endpoints};
pub use context::ClientContext;
pub use error::{ClientError, ErrorCode, Result};
pub use guard::{AuthGuard, EventOwnerGuard, GuardDecision, RouteRequest};
pub use navigation::{Navigator, Redirect};
pub use notify::{Notice, Notifier};
pub use session::{Session, SessionStore, UserProfile};
