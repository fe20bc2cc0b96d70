use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        AuthError, Claims, Clock, RegisterProfile, SystemClock, TokenBundle,
        jwt::{JwtKeys, decode_access_token, encode_token, make_access_claims, now_unix},
        password::{hash_password_blocking, verify_password_blocking},
        tokens::{generate_refresh_token, generate_verify_code},
    },
    config::{AuthConfig, LastLoginPolicy},
    db::dao::{RefreshTokenDao, user_dao::NewUser},
    db::entities::{UserStatus, user},
    mailer::{
        Mailer,
        templates::{VERIFY_EMAIL_SUBJECT, VerifyEmailTemplate},
    },
    services::user_service::UserService,
    tasks::BackgroundTasks,
};

use super::AuthProvider;

const TOKEN_TYPE: &str = "Bearer";

/// Email/password accounts stored in the local database, HS256 access tokens
/// and opaque, single-use refresh tokens.
#[derive(Clone)]
pub struct LocalAuthProvider {
    user_service: UserService,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
    access_ttl_secs: usize,
    refresh_ttl: Duration,
    last_login_policy: LastLoginPolicy,
    clock: Arc<dyn Clock>,
    mailer: Mailer,
    tasks: BackgroundTasks,
}

impl LocalAuthProvider {
    pub fn new(
        user_service: UserService,
        refresh_token_dao: RefreshTokenDao,
        cfg: &AuthConfig,
        mailer: Mailer,
        tasks: BackgroundTasks,
    ) -> Self {
        Self {
            user_service,
            refresh_token_dao,
            jwt: JwtKeys::from_secret(cfg.jwt_secret.as_bytes()),
            access_ttl_secs: cfg.access_ttl_secs(),
            refresh_ttl: Duration::days(i64::from(cfg.refresh_ttl_days)),
            last_login_policy: cfg.last_login_policy,
            clock: Arc::new(SystemClock),
            mailer,
            tasks,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The pair is only handed out once the refresh row is stored.
    async fn issue_tokens(&self, user: &user::Model) -> Result<TokenBundle, AuthError> {
        let iat = now_unix(self.clock.as_ref());
        let claims = make_access_claims(&user.id, &user.email, iat, self.access_ttl_secs);
        let access_token = encode_token(&self.jwt, &claims)?;

        let expires_at = self
            .clock
            .now()
            .fixed_offset()
            .checked_add_signed(self.refresh_ttl)
            .ok_or_else(|| AuthError::Internal("refresh token expiry out of range".to_string()))?;
        let refresh_token = generate_refresh_token();
        self.refresh_token_dao
            .save(&user.id, &refresh_token, expires_at)
            .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE,
            expires_in: self.access_ttl_secs,
        })
    }

    async fn record_login(&self, user: &user::Model) -> Result<(), AuthError> {
        let now = self.clock.now().fixed_offset();
        match self.user_service.set_last_login(&user.id, &now).await {
            Ok(()) => Ok(()),
            Err(err) => match self.last_login_policy {
                LastLoginPolicy::Strict => Err(err.into()),
                LastLoginPolicy::BestEffort => {
                    warn!(user_id = %user.id, error = %err, "failed to record last login");
                    Ok(())
                }
            },
        }
    }

    fn queue_verify_email(&self, user_id: Uuid) {
        let users = self.user_service.clone();
        let mailer = self.mailer.clone();
        self.tasks.submit("send_verify_email", async move {
            deliver_verify_code(&users, &mailer, &user_id)
                .await
                .map_err(anyhow::Error::from)
        });
    }
}

async fn deliver_verify_code(
    users: &UserService,
    mailer: &Mailer,
    user_id: &Uuid,
) -> Result<(), AuthError> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let code = generate_verify_code();
    users.set_verify_email_code(&user.id, &code).await?;

    let name = user.full_name();
    let template = VerifyEmailTemplate {
        name: &name,
        code: &code,
    };
    mailer
        .send_templated(&user.email, VERIFY_EMAIL_SUBJECT, &template)
        .await?;

    info!(user_id = %user.id, "verification email sent");
    Ok(())
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn register(&self, profile: RegisterProfile) -> Result<TokenBundle, AuthError> {
        let RegisterProfile {
            email,
            password,
            first_name,
            last_name,
            phone_number,
        } = profile;

        if self.user_service.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password_blocking(password).await?;
        let created = self
            .user_service
            .create_user(NewUser {
                email,
                password_hash,
                first_name,
                last_name,
                phone_number,
                status: UserStatus::Active,
            })
            .await;
        let user = match created {
            Ok(user) => user,
            // Lost a race with a concurrent registration of the same address.
            Err(err) if err.is_unique_violation() => return Err(AuthError::EmailAlreadyExists),
            Err(err) => return Err(err.into()),
        };

        let bundle = self.issue_tokens(&user).await?;
        self.queue_verify_email(user.id);

        info!(user_id = %user.id, "user registered");
        Ok(bundle)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AuthError> {
        let user = self
            .user_service
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active() {
            return Err(AuthError::UserNotActive);
        }

        let password_ok =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        self.record_login(&user).await?;
        let bundle = self.issue_tokens(&user).await?;

        info!(user_id = %user.id, "user logged in");
        Ok(bundle)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AuthError> {
        let token = self
            .refresh_token_dao
            .find_by_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if token.is_expired_at(self.clock.now().fixed_offset()) {
            if let Err(err) = self.refresh_token_dao.delete_by_token(refresh_token).await {
                warn!(user_id = %token.user_id, error = %err, "failed to delete expired refresh token");
            }
            return Err(AuthError::InvalidRefreshToken);
        }

        // Only the request that actually removes the row may continue.
        let removed = self.refresh_token_dao.delete_by_token(refresh_token).await?;
        if removed != 1 {
            warn!(user_id = %token.user_id, "refresh token already consumed");
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .user_service
            .find_by_id(&token.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;
        if !user.is_active() {
            return Err(AuthError::UserNotActive);
        }

        self.issue_tokens(&user).await
    }

    async fn logout(&self, user_id: &Uuid) -> Result<(), AuthError> {
        let revoked = self.refresh_token_dao.delete_all_for_user(user_id).await?;
        info!(user_id = %user_id, revoked, "user logged out");
        Ok(())
    }

    async fn verify(&self, access_token: &str) -> Result<Claims, AuthError> {
        decode_access_token(&self.jwt, access_token, now_unix(self.clock.as_ref()))
    }

    async fn send_verify_email_code(&self, user_id: &Uuid) -> Result<(), AuthError> {
        deliver_verify_code(&self.user_service, &self.mailer, user_id).await
    }

    async fn verify_email(&self, user_id: &Uuid, code: &str) -> Result<(), AuthError> {
        let user = self
            .user_service
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email_verified {
            return Ok(());
        }

        match user.verify_email_code.as_deref() {
            Some(stored) if stored == code => {}
            _ => return Err(AuthError::InvalidVerifyCode),
        }

        self.user_service.mark_email_verified(&user.id).await?;
        info!(user_id = %user.id, "email verified");
        Ok(())
    }

    async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .user_service
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_ok =
            verify_password_blocking(current_password.to_string(), user.password_hash.clone())
                .await?;
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = hash_password_blocking(new_password.to_string()).await?;
        self.user_service
            .set_password_hash(&user.id, &password_hash)
            .await?;

        let revoked = self.refresh_token_dao.delete_all_for_user(&user.id).await?;
        info!(user_id = %user.id, revoked, "password changed");
        Ok(())
    }
}
