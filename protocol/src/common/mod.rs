pub mod auth;
pub mod event;
pub mod results;
pub mod user;

pub use auth::*;
pub use event::*;
pub use results::*;
pub use user::*;
