use anyhow::{Result, bail};

use super::AppConfig;

pub const MAX_ACCESS_TTL_MINUTES: u32 = 24 * 60;
pub const MAX_REFRESH_TTL_DAYS: u32 = 3650;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_ttl_minutes == 0 {
            errors.push("auth.access_ttl_minutes must be > 0".to_string());
        } else if auth.access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            errors.push(format!(
                "auth.access_ttl_minutes must be <= {MAX_ACCESS_TTL_MINUTES}"
            ));
        }

        if auth.refresh_ttl_days == 0 {
            errors.push("auth.refresh_ttl_days must be > 0".to_string());
        } else if auth.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            errors.push(format!(
                "auth.refresh_ttl_days must be <= {MAX_REFRESH_TTL_DAYS}"
            ));
        }
    }

    if let Some(mail) = cfg.mail.as_ref() {
        if mail.from_addr.trim().is_empty() {
            errors.push("mail.from_addr must not be empty".to_string());
        }

        if mail.smtp_server.trim().is_empty() {
            errors.push("mail.smtp_server must not be empty".to_string());
        }

        if mail.smtp_username.is_empty() != mail.smtp_password.is_empty() {
            errors.push(
                "mail.smtp_username and mail.smtp_password must be set together".to_string(),
            );
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
