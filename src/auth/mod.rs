pub mod bootstrap;
pub mod clock;
mod error;
pub mod jwt;
pub mod password;
pub mod providers;
pub mod tokens;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::AuthError;
pub use types::{Claims, RegisterProfile, TokenBundle};
