use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::models::VehicleLimits;

/// Overrides `auth.jwt_secret` when set
pub const JWT_SECRET_ENV: &str = "AUTOPLAZA_JWT_SECRET";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub vehicle_limits: VehicleLimits,
    #[serde(default)]
    pub images: ImageConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    48
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageConfig {
    pub upload_dir: String,
    pub allowed_extensions: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "static/images".to_string(),
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "autoplaza.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            gateway: GatewayConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            auth: AuthConfig {
                jwt_secret: "change-me".to_string(),
                token_ttl_hours: default_token_ttl_hours(),
            },
            vehicle_limits: VehicleLimits::default(),
            images: ImageConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        Ok(config.with_env_overrides(std::env::var(JWT_SECRET_ENV).ok()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        anyhow::ensure!(
            !config.auth.jwt_secret.is_empty(),
            "auth.jwt_secret must not be empty"
        );
        anyhow::ensure!(
            config.auth.token_ttl_hours > 0,
            "auth.token_ttl_hours must be positive"
        );
        Ok(config)
    }

    fn with_env_overrides(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = secret;
        }
        self
    }
}
