use std::sync::Arc;

use anyhow::Context;

use crate::{
    config::{AppConfig, AuthConfig},
    mailer::Mailer,
    services::ServiceContext,
    tasks::BackgroundTasks,
};

use super::providers::{AuthProvider, LocalAuthProvider};

pub fn build_provider(
    cfg: &AuthConfig,
    services: &ServiceContext,
    mailer: Mailer,
    tasks: BackgroundTasks,
) -> Arc<dyn AuthProvider> {
    Arc::new(LocalAuthProvider::new(
        services.user(),
        services.refresh_token_dao(),
        cfg,
        mailer,
        tasks,
    ))
}

pub fn init_provider(
    cfg: &AppConfig,
    services: &ServiceContext,
    tasks: BackgroundTasks,
) -> anyhow::Result<Arc<dyn AuthProvider>> {
    let auth_cfg = cfg
        .auth
        .as_ref()
        .context("auth config missing (set APP_AUTH__JWT_SECRET)")?;
    let mailer = Mailer::from_config(cfg.mail.as_ref()).context("failed to set up mailer")?;

    tracing::info!(
        access_ttl_minutes = auth_cfg.access_ttl_minutes,
        refresh_ttl_days = auth_cfg.refresh_ttl_days,
        last_login_policy = ?auth_cfg.last_login_policy,
        "local auth provider ready"
    );
    Ok(build_provider(auth_cfg, services, mailer, tasks))
}
