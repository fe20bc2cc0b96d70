pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod refresh_token_dao;
pub mod user_dao;

pub use base::DaoBase;
pub use base_traits::{HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use refresh_token_dao::RefreshTokenDao;
pub use user_dao::UserDao;
