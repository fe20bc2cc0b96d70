use uuid::Uuid;

use crate::{
    auth::{Claims, RegisterProfile, TokenBundle, providers::AuthProvider},
    error::AppError,
};

/// HTTP-facing facade over the configured [`AuthProvider`]; translates domain
/// errors into [`AppError`].
#[derive(Clone, Copy)]
pub struct AuthService<'a> {
    provider: &'a dyn AuthProvider,
}

impl<'a> AuthService<'a> {
    pub fn new(provider: &'a dyn AuthProvider) -> Self {
        Self { provider }
    }

    pub async fn register(&self, profile: RegisterProfile) -> Result<TokenBundle, AppError> {
        Ok(self.provider.register(profile).await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        Ok(self.provider.login(email, password).await?)
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        Ok(self.provider.refresh(refresh_token).await?)
    }

    pub async fn logout(&self, user_id: &Uuid) -> Result<(), AppError> {
        Ok(self.provider.logout(user_id).await?)
    }

    pub async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        Ok(self.provider.verify(access_token).await?)
    }

    pub async fn send_verify_email_code(&self, user_id: &Uuid) -> Result<(), AppError> {
        Ok(self.provider.send_verify_email_code(user_id).await?)
    }

    pub async fn verify_email(&self, user_id: &Uuid, code: &str) -> Result<(), AppError> {
        Ok(self.provider.verify_email(user_id, code).await?)
    }

    pub async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        Ok(self
            .provider
            .change_password(user_id, current_password, new_password)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::auth::{AuthError, Claims, RegisterProfile, TokenBundle, providers::AuthProvider};

    use super::AuthService;

    struct DelegatingProvider;

    fn bundle(access_token: String) -> TokenBundle {
        TokenBundle {
            access_token,
            refresh_token: "refresh".to_string(),
            token_type: "Bearer",
            expires_in: 900,
        }
    }

    #[async_trait]
    impl AuthProvider for DelegatingProvider {
        async fn register(&self, profile: RegisterProfile) -> Result<TokenBundle, AuthError> {
            Ok(bundle(format!("register:{}", profile.email)))
        }

        async fn login(&self, email: &str, _password: &str) -> Result<TokenBundle, AuthError> {
            Ok(bundle(format!("login:{email}")))
        }

        async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AuthError> {
            if refresh_token == "stale" {
                return Err(AuthError::InvalidRefreshToken);
            }
            Ok(bundle(format!("refresh:{refresh_token}")))
        }

        async fn logout(&self, _user_id: &Uuid) -> Result<(), AuthError> {
            Ok(())
        }

        async fn verify(&self, access_token: &str) -> Result<Claims, AuthError> {
            Ok(Claims {
                sub: access_token.to_string(),
                email: "alice@example.com".to_string(),
                iat: 10,
                exp: 100,
            })
        }

        async fn send_verify_email_code(&self, _user_id: &Uuid) -> Result<(), AuthError> {
            Err(AuthError::UserNotFound)
        }

        async fn verify_email(&self, _user_id: &Uuid, code: &str) -> Result<(), AuthError> {
            if code == "a1B2c3" {
                Ok(())
            } else {
                Err(AuthError::InvalidVerifyCode)
            }
        }

        async fn change_password(
            &self,
            _user_id: &Uuid,
            current_password: &str,
            _new_password: &str,
        ) -> Result<(), AuthError> {
            if current_password == "Secur3Pass!" {
                Ok(())
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    #[tokio::test]
    async fn delegates_to_the_provider() {
        let provider = DelegatingProvider;
        let service = AuthService::new(&provider);

        let register = service
            .register(RegisterProfile {
                email: "alice@example.com".to_string(),
                password: "Secur3Pass!".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                phone_number: None,
            })
            .await
            .expect("register should succeed");
        assert_eq!(register.access_token, "register:alice@example.com");

        let login = service
            .login("alice@example.com", "Secur3Pass!")
            .await
            .expect("login should succeed");
        assert_eq!(login.access_token, "login:alice@example.com");

        let refreshed = service
            .refresh("token-1")
            .await
            .expect("refresh should succeed");
        assert_eq!(refreshed.access_token, "refresh:token-1");

        let claims = service
            .verify("subject-1")
            .await
            .expect("verify should succeed");
        assert_eq!(claims.sub, "subject-1");

        service
            .logout(&Uuid::new_v4())
            .await
            .expect("logout should succeed");
        service
            .verify_email(&Uuid::new_v4(), "a1B2c3")
            .await
            .expect("verify email should succeed");
        service
            .change_password(&Uuid::new_v4(), "Secur3Pass!", "N3wSecur3Pass!")
            .await
            .expect("change password should succeed");
    }

    #[tokio::test]
    async fn maps_domain_errors_to_http_errors() {
        let provider = DelegatingProvider;
        let service = AuthService::new(&provider);

        let err = service.refresh("stale").await.expect_err("refresh should fail");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Invalid refresh token");

        let err = service
            .verify_email(&Uuid::new_v4(), "wrong1")
            .await
            .expect_err("verify email should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = service
            .change_password(&Uuid::new_v4(), "wrong", "N3wSecur3Pass!")
            .await
            .expect_err("change password should fail");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Invalid credentials");

        let err = service
            .send_verify_email_code(&Uuid::new_v4())
            .await
            .expect_err("resend should fail");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
