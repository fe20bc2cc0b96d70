pub mod local;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AuthError, Claims, RegisterProfile, TokenBundle};

pub use local::LocalAuthProvider;

/// The session lifecycle as seen by the HTTP layer.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn register(&self, profile: RegisterProfile) -> Result<TokenBundle, AuthError>;
    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AuthError>;
    /// Consumes `refresh_token`; at most one caller can succeed per token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AuthError>;
    /// Revokes every refresh token of the user. Issued access tokens stay
    /// valid until they expire.
    async fn logout(&self, user_id: &Uuid) -> Result<(), AuthError>;
    async fn verify(&self, access_token: &str) -> Result<Claims, AuthError>;
    async fn send_verify_email_code(&self, user_id: &Uuid) -> Result<(), AuthError>;
    async fn verify_email(&self, user_id: &Uuid, code: &str) -> Result<(), AuthError>;
    /// Replaces the password after checking the current one, then revokes
    /// every refresh token of the user.
    async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
