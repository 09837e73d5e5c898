use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::payments::payload::DEFAULT_ORIGIN;
use crate::payments::providers::paypal::SANDBOX_BASE_URL;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub paypal: PaypalSettings,
    pub secrets: SecretsConfig,
    pub checkout: CheckoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaypalSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    pub default_origin: String,
    pub pending_ttl_secs: u64,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .context("PORT not set")?
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        };

        let paypal = PaypalSettings {
            base_url: env::var("PAYPAL_BASE_URL").unwrap_or_else(|_| SANDBOX_BASE_URL.to_string()),
            timeout_secs: parse_or("PAYPAL_TIMEOUT_SECS", 30)?,
        };

        let secrets = SecretsConfig {
            dir: env::var("SECRETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/run/secrets")),
        };

        let checkout = CheckoutConfig {
            default_origin: env::var("CHECKOUT_DEFAULT_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_ORIGIN.to_string()),
            pending_ttl_secs: parse_or("PENDING_ORDER_TTL_SECS", 3600)?,
        };

        let config = Config {
            server,
            paypal,
            secrets,
            checkout,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Validate port range
        if self.server.port < 1024 {
            return Err(anyhow!(
                "Port must be at least 1024, got {}",
                self.server.port
            ));
        }

        // Validate environment
        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.server.environment
            ));
        }

        if !is_http_url(&self.paypal.base_url) {
            return Err(anyhow!(
                "PAYPAL_BASE_URL must be an http(s) URL, got {}",
                self.paypal.base_url
            ));
        }

        if self.server.environment == "production" && !self.paypal.base_url.starts_with("https://") {
            return Err(anyhow!("PAYPAL_BASE_URL must use https in production"));
        }

        if self.paypal.timeout_secs == 0 {
            return Err(anyhow!("PAYPAL_TIMEOUT_SECS must be greater than 0"));
        }

        if self.secrets.dir.as_os_str().is_empty() {
            return Err(anyhow!("SECRETS_DIR cannot be empty"));
        }

        if !is_http_url(&self.checkout.default_origin) {
            return Err(anyhow!(
                "CHECKOUT_DEFAULT_ORIGIN must be an http(s) URL, got {}",
                self.checkout.default_origin
            ));
        }

        if self.checkout.pending_ttl_secs == 0 {
            return Err(anyhow!("PENDING_ORDER_TTL_SECS must be greater than 0"));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    (value.starts_with("http://") || value.starts_with("https://")) && value.len() > "https://".len()
}
