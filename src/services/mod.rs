//! Thin REST clients for the platform's resources.
//!
//! Every service wraps an [`ApiClient`](crate::client::ApiClient), so calls
//! share the interceptor's credential and failure handling.

pub mod attachments;
pub mod categories;
pub mod events;
pub mod leaderboard;
pub mod registrations;
pub mod timeline;
pub mod workouts;

pub use attachments::AttachmentService;
pub use categories::CategoryService;
pub use events::EventService;
pub use leaderboard::LeaderboardService;
pub use registrations::RegistrationService;
pub use timeline::TimelineService;
pub use workouts::WorkoutService;
