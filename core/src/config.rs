//! Client configuration.
//!
//! The core only ever sees a `ClientConfig`. Reading the process
//! environment is confined to `from_env`, which callers use at the process
//! boundary; `from_lookup` is the same logic over any key lookup.

use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://the-one-api.dev/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ACCESS_TOKEN_VAR: &str = "LOTR_API_ACCESS_TOKEN";
pub const BASE_URL_VAR: &str = "LOTR_API_BASE_URL";

#[derive(Clone)]
pub struct ClientConfig {
    access_token: String,
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Fails with `ApiError::Configuration` when the token is blank.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(ApiError::Configuration(format!(
                "access token missing; pass one explicitly or set {ACCESS_TOKEN_VAR}"
            )));
        }
        Ok(Self {
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ACCESS_TOKEN_VAR).unwrap_or_default();
        let config = Self::new(token)?;
        Ok(match lookup(BASE_URL_VAR) {
            Some(url) if !url.trim().is_empty() => config.with_base_url(&url),
            _ => config,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn blank_token_fails_fast() {
        assert!(matches!(ClientConfig::new(""), Err(ApiError::Configuration(_))));
        assert!(matches!(ClientConfig::new("  "), Err(ApiError::Configuration(_))));
    }

    #[test]
    fn defaults_apply() {
        let config = ClientConfig::new("token").unwrap();
        assert_eq!(config.access_token(), "token");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("token")
            .unwrap()
            .with_base_url("http://localhost:3000/");
        assert_eq!(config.base_url(), "http://localhost:3000");
    }

    #[test]
    fn lookup_reads_token_and_base_url() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ACCESS_TOKEN_VAR, "secret"),
            (BASE_URL_VAR, "http://127.0.0.1:9999/v2/"),
        ]))
        .unwrap();
        assert_eq!(config.access_token(), "secret");
        assert_eq!(config.base_url(), "http://127.0.0.1:9999/v2");
    }

    #[test]
    fn lookup_without_token_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(lookup(&[(BASE_URL_VAR, "http://x")])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(msg) if msg.contains(ACCESS_TOKEN_VAR)));
    }

    #[test]
    fn debug_redacts_token() {
        let config = ClientConfig::new("secret").unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
