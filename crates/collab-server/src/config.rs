use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::warn;

const DEV_SECRET: &str = "dev-secret-change-me";

/// Values that must never sign production sessions.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", DEV_SECRET];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub production: bool,
    pub client_origin: String,
    pub seed_demo: bool,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref().map(str::trim),
        Ok("1" | "true" | "yes" | "on")
    )
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let production = var_or("COLLAB_ENV", "development") == "production";

        let jwt_secret = var_or("COLLAB_JWT_SECRET", DEV_SECRET);
        if PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            if production {
                bail!("COLLAB_JWT_SECRET is unset or still a placeholder; refusing to start in production");
            }
            warn!("COLLAB_JWT_SECRET is unset or a placeholder. Sessions are forgeable; set it before deploying.");
        }

        let port = var_or("COLLAB_PORT", "5174")
            .parse()
            .context("COLLAB_PORT must be a port number")?;

        Ok(Self {
            host: var_or("COLLAB_HOST", "0.0.0.0"),
            port,
            data_dir: PathBuf::from(var_or("COLLAB_DATA_DIR", "./data")),
            jwt_secret,
            production,
            client_origin: var_or("COLLAB_CLIENT_ORIGIN", "http://localhost:5173"),
            seed_demo: flag("COLLAB_SEED_DEMO"),
        })
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}
