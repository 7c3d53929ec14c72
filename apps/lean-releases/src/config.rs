//! Runtime configuration assembled from the environment.
//!
//! The configuration is read once at start-up and passed by reference to
//! everything that talks to the network or writes CI output.
//!
//! ## Environment Variables
//!
//! - `GITHUB_TOKEN`: bearer token sent with every request (optional)
//! - `GITHUB_OUTPUT`: file that `discover` appends the matrix line to (optional)
//! - `LEAN_RELEASES_API_URL`: API base URL (default: `https://api.github.com`)
//!
//! Empty or whitespace-only values are treated as unset.

use std::path::PathBuf;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable naming the CI output file.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "LEAN_RELEASES_API_URL";

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Immutable settings shared by all operations.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// API base URL without a trailing slash.
    pub api_url: String,
    /// Bearer token for authenticated requests.
    pub token: Option<String>,
    /// File to append the discovery result to.
    pub output_path: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = get(API_URL_ENV).map_or_else(
            || DEFAULT_API_URL.to_string(),
            |url| url.trim().trim_end_matches('/').to_string(),
        );

        Self {
            api_url,
            token: get(TOKEN_ENV).map(|token| token.trim().to_string()),
            output_path: get(OUTPUT_ENV).map(PathBuf::from),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("output_path", &self.output_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
        assert!(config.output_path.is_none());
    }

    #[test]
    fn reads_token_and_output_path() {
        let config = config_from(&[(TOKEN_ENV, "ghp_secret"), (OUTPUT_ENV, "/tmp/gh-output")]);
        assert_eq!(config.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.output_path, Some(PathBuf::from("/tmp/gh-output")));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = config_from(&[(TOKEN_ENV, ""), (OUTPUT_ENV, "   "), (API_URL_ENV, " ")]);
        assert!(config.token.is_none());
        assert!(config.output_path.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn api_url_is_trimmed_and_loses_trailing_slashes() {
        let config = config_from(&[(API_URL_ENV, "  http://127.0.0.1:8080// ")]);
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = config_from(&[(TOKEN_ENV, "ghp_secret")]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    #[serial_test::serial]
    fn from_env_reads_process_environment() {
        // SAFETY: serialised with other environment tests; restored below.
        unsafe {
            env::set_var(API_URL_ENV, "http://localhost:9999/");
            env::remove_var(TOKEN_ENV);
        }

        let config = Config::from_env();

        // SAFETY: cleanup of the variable set above.
        unsafe {
            env::remove_var(API_URL_ENV);
        }

        assert_eq!(config.api_url, "http://localhost:9999");
        assert!(config.token.is_none());
    }
}
