use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "cookbook.db")
    pub db_path: String,
    /// Path to the sync cursor file (default: "cookbook.cursor.json")
    pub cursor_path: String,
    /// Base URL of the remote document API (default: "http://localhost:3000")
    pub remote_url: String,
    /// Bearer token for the remote. Writes fail without one.
    pub auth_token: Option<String>,
    /// Identity of the signed-in user, used as owner for new recipes.
    pub user_id: Option<String>,
    /// Base URL of the public recipe catalogue
    pub catalog_url: String,
    /// HTTP request timeout in seconds (default: 10)
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COOKBOOK_DB_PATH` - SQLite database path (default: "cookbook.db")
    /// - `COOKBOOK_CURSOR_PATH` - Sync cursor file (default: "cookbook.cursor.json")
    /// - `COOKBOOK_REMOTE_URL` - Remote API URL (default: "http://localhost:3000")
    /// - `COOKBOOK_AUTH_TOKEN` - Bearer token (default: none)
    /// - `COOKBOOK_USER_ID` - Signed-in user (default: none)
    /// - `COOKBOOK_CATALOG_URL` - Catalogue URL (default: "https://www.themealdb.com/api/json/v1/1")
    /// - `COOKBOOK_HTTP_TIMEOUT_SECS` - HTTP timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            db_path: lookup("COOKBOOK_DB_PATH").unwrap_or_else(|| "cookbook.db".to_string()),
            cursor_path: lookup("COOKBOOK_CURSOR_PATH")
                .unwrap_or_else(|| "cookbook.cursor.json".to_string()),
            remote_url: lookup("COOKBOOK_REMOTE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            auth_token: lookup("COOKBOOK_AUTH_TOKEN").filter(|v| !v.is_empty()),
            user_id: lookup("COOKBOOK_USER_ID").filter(|v| !v.is_empty()),
            catalog_url: lookup("COOKBOOK_CATALOG_URL")
                .unwrap_or_else(|| "https://www.themealdb.com/api/json/v1/1".to_string()),
            http_timeout_secs: lookup("COOKBOOK_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the HTTP timeout as a Duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.db_path, "cookbook.db");
        assert_eq!(config.cursor_path, "cookbook.cursor.json");
        assert_eq!(config.remote_url, "http://localhost:3000");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.user_id, None);
        assert_eq!(config.catalog_url, "https://www.themealdb.com/api/json/v1/1");
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_values_from_variables() {
        let config = config_from(&[
            ("COOKBOOK_DB_PATH", "/tmp/c.db"),
            ("COOKBOOK_AUTH_TOKEN", "secret"),
            ("COOKBOOK_USER_ID", "alice"),
            ("COOKBOOK_HTTP_TIMEOUT_SECS", "3"),
        ]);

        assert_eq!(config.db_path, "/tmp/c.db");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.user_id.as_deref(), Some("alice"));
        assert_eq!(config.http_timeout_secs, 3);
    }

    #[test]
    fn test_unparsable_timeout_falls_back() {
        let config = config_from(&[("COOKBOOK_HTTP_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.http_timeout_secs, 10);
    }

    #[test]
    fn test_empty_token_is_no_token() {
        let config = config_from(&[("COOKBOOK_AUTH_TOKEN", "")]);
        assert_eq!(config.auth_token, None);
    }
}
