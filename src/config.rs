use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub uploads_dir: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub app_url: String,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn load() -> Self {
        let smtp = match (var("SMTP_USER"), var("SMTP_PASS")) {
            (Some(user), Some(pass)) => Some(SmtpConfig {
                host: try_load("SMTP_HOST", "localhost"),
                port: try_load("SMTP_PORT", "587"),
                user,
                pass,
            }),
            _ => {
                info!("SMTP_USER/SMTP_PASS not set, email delivery disabled");
                None
            }
        };

        Self {
            port: try_load("PORT", "3000"),
            database_path: try_load("DATABASE_PATH", "velonix.db"),
            uploads_dir: try_load("UPLOADS_DIR", "uploads"),
            admin_password: load_secret("ADMIN_PASSWORD", "admin123"),
            jwt_secret: load_secret("JWT_SECRET", "secret"),
            app_url: try_load("APP_URL", "http://localhost:3000"),
            smtp,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Secrets never log their default; the fallback is a development
/// convenience only.
fn load_secret(key: &str, fallback: &str) -> String {
    var(key).unwrap_or_else(|| {
        warn!("{key} not set, falling back to the built-in development value");
        fallback.to_string()
    })
}
