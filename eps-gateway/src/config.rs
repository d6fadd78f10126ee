use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use common_crypto::SecretString;
use serde::Serialize;

use crate::environment::Environment;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Merchant credentials and transport settings for one client instance.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant username, an email address.
    pub username: String,
    pub password: SecretString,
    /// Key used for the HMAC-SHA512 `x-hash` header.
    pub hash_key: SecretString,
    pub merchant_id: String,
    pub store_id: String,
    pub sandbox: bool,
    pub timeout: Duration,
}

/// Non-sensitive view of a [`GatewayConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub username: String,
    pub merchant_id: String,
    pub store_id: String,
    pub sandbox: bool,
}

impl GatewayConfig {
    /// Production environment with a 30 second timeout unless overridden.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<SecretString>,
        hash_key: impl Into<SecretString>,
        merchant_id: impl Into<String>,
        store_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            hash_key: hash_key.into(),
            merchant_id: merchant_id.into(),
            store_id: store_id.into(),
            sandbox: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn environment(&self) -> Environment {
        if self.sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            username: self.username.clone(),
            merchant_id: self.merchant_id.clone(),
            store_id: self.store_id.clone(),
            sandbox: self.sandbox,
        }
    }

    pub fn from_env() -> Result<Self> {
        let username = env::var("EPS_USERNAME").context("EPS_USERNAME must be set")?;
        let password = env::var("EPS_PASSWORD").context("EPS_PASSWORD must be set")?;
        let hash_key = env::var("EPS_HASH_KEY").context("EPS_HASH_KEY must be set")?;
        let merchant_id = env::var("EPS_MERCHANT_ID").context("EPS_MERCHANT_ID must be set")?;
        let store_id = env::var("EPS_STORE_ID").context("EPS_STORE_ID must be set")?;
        let sandbox = bool_from_env("EPS_SANDBOX").unwrap_or(false);
        let timeout_ms = env::var("EPS_TIMEOUT_MS")
            .ok()
            .map(|value| value.trim().parse::<u64>())
            .transpose()
            .context("Failed to parse EPS_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_TIMEOUT.as_millis() as u64);

        Ok(Self::new(
            username.trim(),
            password,
            hash_key.trim(),
            merchant_id.trim(),
            store_id.trim(),
        )
        .with_sandbox(sandbox)
        .with_timeout(Duration::from_millis(timeout_ms.max(1))))
    }
}

fn bool_from_env(key: &str) -> Option<bool> {
    env::var(key).ok().map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GatewayConfig {
        GatewayConfig::new(
            "merchant@example.com",
            "p4ssw0rd",
            "SFNLQHJlY2lwZXdhbGEjYTc3Zi1mOTQ5NWZhY2M2ZTZuZXQ=",
            "29e86e70-0ac6-45eb-ba04-9fcb0aaed12a",
            "d44e705f-9e3a-41de-98b1-1674631637da",
        )
    }

    #[test]
    fn defaults_to_production_and_thirty_seconds() {
        let config = sample();
        assert!(!config.sandbox);
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_setters_apply() {
        let config = sample()
            .with_sandbox(true)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.environment(), Environment::Sandbox);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn summary_and_debug_hide_secrets() {
        let config = sample();
        let summary = config.summary();
        assert_eq!(summary.username, "merchant@example.com");
        assert!(!summary.sandbox);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("p4ssw0rd"));
        assert!(!rendered.contains("SFNLQHJl"));
    }

    #[test]
    fn bool_from_env_parses() {
        std::env::set_var("EPS_TEST_BOOL_TRUE", "Yes");
        std::env::set_var("EPS_TEST_BOOL_FALSE", "off");
        assert_eq!(bool_from_env("EPS_TEST_BOOL_TRUE"), Some(true));
        assert_eq!(bool_from_env("EPS_TEST_BOOL_FALSE"), Some(false));
        assert_eq!(bool_from_env("EPS_TEST_BOOL_UNSET"), None);
    }
}
