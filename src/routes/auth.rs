use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{RegisterProfile, TokenBundle},
    error::AppError,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

use super::validation::{
    require, validate_email, validate_name, validate_password, validate_phone_number,
    validate_verify_code,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    // No length rule here: a short password is just a wrong password.
    fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        validate_password("password", &self.password)?;
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        if let Some(phone) = self.phone_number.as_deref() {
            validate_phone_number(phone)?;
        }
        Ok(())
    }
}

impl From<RegisterRequest> for RegisterProfile {
    fn from(body: RegisterRequest) -> Self {
        Self {
            email: body.email.trim().to_string(),
            password: body.password,
            first_name: body.first_name.trim().to_string(),
            last_name: body.last_name.trim().to_string(),
            phone_number: body.phone_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}

impl From<TokenBundle> for TokenResponse {
    fn from(bundle: TokenBundle) -> Self {
        Self {
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
            token_type: bundle.token_type,
            expires_in: bundle.expires_in,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/refresh-token", post(refresh))
        .route("/logout", post(logout))
        .route("/verify-email", post(verify_email))
        .route("/verify-email/resend", post(resend_verify_email))
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    body.validate()?;
    let services = ServiceContext::from_state(state.as_ref());
    let service = services.auth(state.auth.as_ref());
    let tokens = service.login(body.email.trim(), &body.password).await?;
    JsonApiResponse::ok(tokens.into())
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    body.validate()?;
    let services = ServiceContext::from_state(state.as_ref());
    let service = services.auth(state.auth.as_ref());
    let tokens = service.register(body.into()).await?;
    JsonApiResponse::created(tokens.into())
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<TokenResponse> {
    require("refresh_token", &body.refresh_token)?;
    let services = ServiceContext::from_state(state.as_ref());
    let service = services.auth(state.auth.as_ref());
    let tokens = service.refresh(&body.refresh_token).await?;
    JsonApiResponse::created(tokens.into())
}

async fn logout(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<()> {
    let user_id = claims.user_id()?;
    let services = ServiceContext::from_state(state.as_ref());
    services.auth(state.auth.as_ref()).logout(&user_id).await?;
    JsonApiResponse::empty()
}

async fn verify_email(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<VerifyEmailRequest>,
) -> ApiResult<()> {
    validate_verify_code(&body.code)?;
    let user_id = claims.user_id()?;
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(state.auth.as_ref())
        .verify_email(&user_id, &body.code)
        .await?;
    JsonApiResponse::empty()
}

async fn resend_verify_email(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<()> {
    let user_id = claims.user_id()?;
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(state.auth.as_ref())
        .send_verify_email_code(&user_id)
        .await?;
    JsonApiResponse::empty()
}

#[cfg(test)]
mod tests {
    use super::{LoginRequest, RegisterRequest};

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "alice@example.com".to_string(),
            password: "Secur3Pass!".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            phone_number: None,
        }
    }

    #[test]
    fn register_request_validates_every_field() {
        register_request().validate().expect("request should be valid");

        let mut bad_phone = register_request();
        bad_phone.phone_number = Some("555-0100".to_string());
        let err = bad_phone.validate().expect_err("phone should be rejected");
        assert!(err.message().starts_with("phone_number:"));

        let mut short_password = register_request();
        short_password.password = "short".to_string();
        let err = short_password
            .validate()
            .expect_err("password should be rejected");
        assert!(err.message().starts_with("password:"));

        let mut no_name = register_request();
        no_name.last_name = String::new();
        let err = no_name.validate().expect_err("name should be rejected");
        assert_eq!(err.message(), "last_name: required");
    }

    #[test]
    fn login_request_allows_short_passwords() {
        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "wrong".to_string(),
        };

        request.validate().expect("short password is a credential check");
    }
}
