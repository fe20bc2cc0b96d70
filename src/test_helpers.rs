use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

use crate::{
    auth::{
        AuthError, SystemClock,
        bootstrap::build_provider,
        jwt::{JwtKeys, encode_token, make_access_claims, now_unix},
    },
    config::{AppConfig, AuthConfig, LastLoginPolicy},
    mailer::{LogTransport, Mailer},
    routes::app,
    services::ServiceContext,
    state::AppState,
    tasks::BackgroundTasks,
};

pub fn test_auth_config(secret: &str) -> AuthConfig {
    AuthConfig {
        jwt_secret: secret.to_string(),
        access_ttl_minutes: 15,
        refresh_ttl_days: 30,
        last_login_policy: LastLoginPolicy::Strict,
    }
}

/// State over `db` with mail going to the log. Must be called inside a tokio
/// runtime; the background worker is spawned on it.
pub fn test_state(db: DatabaseConnection, secret: &str) -> Arc<AppState> {
    let auth_cfg = test_auth_config(secret);
    let services = ServiceContext::new(&db);
    let (tasks, _worker) = BackgroundTasks::spawn();
    let provider = build_provider(
        &auth_cfg,
        &services,
        Mailer::new(Arc::new(LogTransport)),
        tasks,
    );

    let cfg = AppConfig {
        auth: Some(auth_cfg),
        ..AppConfig::default()
    };
    AppState::new(cfg, db, provider)
}

/// Full middleware stack over an empty mock database.
pub fn test_router(secret: &str) -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    app(test_state(db, secret))
}

pub fn access_token_for(user_id: &Uuid, email: &str, secret: &str) -> Result<String, AuthError> {
    let claims = make_access_claims(user_id, email, now_unix(&SystemClock), 15 * 60);
    encode_token(&JwtKeys::from_secret(secret.as_bytes()), &claims)
}
