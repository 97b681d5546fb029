//! Server configuration and base URL resolution.
//!
//! # Design
//! `ServerConfig` is built once at process start from the configured API base
//! URL and the hostname the application is served from. It is immutable after
//! construction; callers that need a different target build a new config.
//! Tests inject both values directly instead of touching the environment.

use std::env;

/// Hostname of the production deployment. Any other hostname talks to the
/// `dev-` prefixed API host.
pub const PRODUCTION_HOSTNAME: &str = "review-me.page";

/// Environment variable holding the production API base URL.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

const DEV_HOST_PREFIX: &str = "dev-";

/// Immutable description of which backend the client should talk to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    api_base_url: Option<String>,
    hostname: String,
}

impl ServerConfig {
    pub fn new(api_base_url: Option<String>, hostname: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.filter(|url| !url.is_empty()),
            hostname: hostname.into(),
        }
    }

    /// Read the base URL from `API_BASE_URL`. An unset or empty variable
    /// leaves the config without a base URL.
    pub fn from_env(hostname: impl Into<String>) -> Self {
        Self::new(env::var(API_BASE_URL_ENV).ok(), hostname)
    }

    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Hostnames are case-insensitive.
    pub fn is_production(&self) -> bool {
        self.hostname.eq_ignore_ascii_case(PRODUCTION_HOSTNAME)
    }

    /// Pick the active API base URL.
    ///
    /// Production hostnames get the configured URL unchanged; everything else
    /// gets the same URL with `dev-` inserted in front of the host. Without a
    /// configured URL the result is an empty string.
    pub fn resolve_base_url(&self) -> String {
        let Some(base_url) = self.api_base_url.as_deref() else {
            return String::new();
        };
        if self.is_production() {
            return base_url.to_string();
        }
        dev_server_url(base_url)
    }
}

fn dev_server_url(base_url: &str) -> String {
    match base_url.split_once("//") {
        Some((scheme, host)) => format!("{scheme}//{DEV_HOST_PREFIX}{host}"),
        None => format!("{DEV_HOST_PREFIX}{base_url}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hostname: &str) -> ServerConfig {
        ServerConfig::new(Some("https://api.x.com".to_string()), hostname)
    }

    #[test]
    fn production_hostname_keeps_base_url() {
        assert_eq!(config(PRODUCTION_HOSTNAME).resolve_base_url(), "https://api.x.com");
    }

    #[test]
    fn production_hostname_ignores_case() {
        for hostname in ["Review-Me.page", "REVIEW-ME.PAGE"] {
            assert!(config(hostname).is_production(), "{hostname}");
            assert_eq!(config(hostname).resolve_base_url(), "https://api.x.com");
        }
    }

    #[test]
    fn other_hostnames_get_dev_prefix() {
        for hostname in ["localhost", "dev.review-me.page", "review-me.page.evil", ""] {
            assert_eq!(
                config(hostname).resolve_base_url(),
                "https://dev-api.x.com",
                "hostname {hostname:?}"
            );
        }
    }

    #[test]
    fn missing_base_url_resolves_to_empty_string() {
        let config = ServerConfig::new(None, PRODUCTION_HOSTNAME);
        assert_eq!(config.resolve_base_url(), "");
        assert_eq!(config.resolve_base_url(), "");

        let config = ServerConfig::new(None, "localhost");
        assert_eq!(config.resolve_base_url(), "");
    }

    #[test]
    fn empty_base_url_is_treated_as_missing() {
        let config = ServerConfig::new(Some(String::new()), "localhost");
        assert!(config.api_base_url().is_none());
        assert_eq!(config.resolve_base_url(), "");
    }

    #[test]
    fn dev_prefix_only_touches_the_host() {
        let config = ServerConfig::new(Some("http://api.x.com:8080/base".to_string()), "localhost");
        assert_eq!(config.resolve_base_url(), "http://dev-api.x.com:8080/base");
    }

    #[test]
    fn schemeless_base_url_gets_prefix_at_start() {
        let config = ServerConfig::new(Some("api.x.com".to_string()), "localhost");
        assert_eq!(config.resolve_base_url(), "dev-api.x.com");
    }

    #[test]
    fn default_config_has_nothing_configured() {
        let config = ServerConfig::default();
        assert!(!config.is_production());
        assert_eq!(config.resolve_base_url(), "");
    }
}
