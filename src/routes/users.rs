use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::AuthError,
    db::entities::{UserStatus, user},
    error::AppError,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

use super::validation::{require, validate_password};

/// Public view of a user; never carries the password hash or the pending
/// verification code.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub email_verified: bool,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            email_verified: model.email_verified,
            status: model.status,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    fn validate(&self) -> Result<(), AppError> {
        require("current_password", &self.current_password)?;
        validate_password("new_password", &self.new_password)?;
        if self.new_password == self.current_password {
            return Err(AppError::bad_request(
                "new_password: must differ from current_password",
            ));
        }
        Ok(())
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/me/password", post(change_password))
        .with_state(state)
}

async fn me(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<UserProfile> {
    let user_id = claims.user_id()?;
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .find_by_id(&user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    JsonApiResponse::ok(user.into())
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    body.validate()?;
    let user_id = claims.user_id()?;
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(state.auth.as_ref())
        .change_password(&user_id, &body.current_password, &body.new_password)
        .await?;
    JsonApiResponse::empty()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::db::entities::{UserStatus, user};

    use super::{ChangePasswordRequest, UserProfile};

    fn change_request(current: &str, new: &str) -> ChangePasswordRequest {
        ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        }
    }

    #[test]
    fn change_password_request_validates_new_password() {
        change_request("Secur3Pass!", "N3wSecur3Pass!")
            .validate()
            .expect("request should be valid");

        let err = change_request("Secur3Pass!", "short")
            .validate()
            .expect_err("short password should be rejected");
        assert_eq!(err.message(), "new_password: must be at least 8 characters");

        let err = change_request("", "N3wSecur3Pass!")
            .validate()
            .expect_err("current password is required");
        assert_eq!(err.message(), "current_password: required");

        let err = change_request("Secur3Pass!", "Secur3Pass!")
            .validate()
            .expect_err("unchanged password should be rejected");
        assert!(err.message().starts_with("new_password:"));
    }

    #[test]
    fn profile_hides_secrets() {
        let now = Utc::now().fixed_offset();
        let model = user::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            phone_number: None,
            status: UserStatus::Active,
            email_verified: false,
            verify_email_code: Some("a1B2c3".to_string()),
            last_login_at: None,
        };

        let json = serde_json::to_value(UserProfile::from(model)).expect("serializable");

        assert_eq!(json["full_name"], "Alice Liddell");
        assert_eq!(json["status"], "active");
        let text = json.to_string();
        assert!(!text.contains("argon2"));
        assert!(!text.contains("a1B2c3"));
    }
}
