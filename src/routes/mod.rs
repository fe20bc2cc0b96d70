pub mod auth;
mod entry;
pub mod users;
pub mod validation;

pub use entry::{API_PREFIX, app, router};
