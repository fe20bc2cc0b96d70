use thiserror::Error;

use crate::{db::dao::DaoLayerError, error::AppError, mailer::MailerError};

/// Failures of the session lifecycle. The first group is the caller's fault
/// and maps to a 4xx; the rest are infrastructure failures and surface as a
/// generic 500.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User is not active")]
    UserNotActive,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Invalid or expired access token")]
    InvalidAccessToken,
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("Invalid verification code")]
    InvalidVerifyCode,
    #[error("User not found")]
    UserNotFound,

    #[error("storage failure: {0}")]
    Storage(#[source] DaoLayerError),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("token signing failed: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),
    #[error("mail delivery failed: {0}")]
    MailDelivery(#[from] MailerError),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl From<DaoLayerError> for AuthError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            // Every user-store mutation loads the row first.
            DaoLayerError::NotFound { .. } => AuthError::UserNotFound,
            err => AuthError::Storage(err),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::UserNotActive
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidAccessToken => AppError::unauthorized(err.to_string()),
            AuthError::EmailAlreadyExists => AppError::conflict(err.to_string()),
            AuthError::InvalidVerifyCode => AppError::bad_request(err.to_string()),
            AuthError::UserNotFound => AppError::not_found(err.to_string()),
            AuthError::Storage(_)
            | AuthError::PasswordHash(_)
            | AuthError::TokenSigning(_)
            | AuthError::MailDelivery(_)
            | AuthError::Internal(_) => AppError::internal(err),
        }
    }
}
