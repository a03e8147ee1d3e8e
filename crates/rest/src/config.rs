//! Server configuration for the content REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BON_CONTENT_SERVER_PORT` | 8080 | Server port |
//! | `BON_CONTENT_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `BON_CONTENT_LOG_LEVEL` | info | Log level |
//! | `BON_CONTENT_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `BON_CONTENT_ENABLE_CORS` | true | Enable CORS |
//! | `BON_CONTENT_CORS_ORIGINS` | * | Allowed origins |
//! | `BON_CONTENT_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `BON_CONTENT_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `BON_CONTENT_BASE_URL` | http://localhost:8080 | Base URL used in `Link` headers |
//! | `BON_CONTENT_DATABASE_URL` | bon-content.db | Store database path (`:memory:` allowed) |
//! | `BON_CONTENT_SEARCH_INDEX_URL` | bon-content-index.db | Search index database path |
//! | `BON_CONTENT_APPLICATION_NAME` | bonContentServiceApp | Prefix of alert and error headers |
//! | `BON_CONTENT_DEFAULT_PAGE_SIZE` | 20 | Page size when `size` is absent |
//! | `BON_CONTENT_MAX_PAGE_SIZE` | 1000 | Upper bound for `size` |
//! | `BON_CONTENT_REINDEX_ON_STARTUP` | false | Rebuild the search index at startup |
//!
//! # Example
//!
//! ```rust
//! use bon_content_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;

/// Server configuration for the content REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "bon-content")]
#[command(about = "Bon content service")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "BON_CONTENT_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "BON_CONTENT_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "BON_CONTENT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "BON_CONTENT_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "BON_CONTENT_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "BON_CONTENT_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "BON_CONTENT_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "BON_CONTENT_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used in `Link` headers).
    #[arg(long, env = "BON_CONTENT_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Store database path.
    #[arg(long, env = "BON_CONTENT_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Search index database path.
    #[arg(long, env = "BON_CONTENT_SEARCH_INDEX_URL")]
    pub search_index_url: Option<String>,

    /// Application name used as the prefix of alert and error headers.
    #[arg(
        long,
        env = "BON_CONTENT_APPLICATION_NAME",
        default_value = "bonContentServiceApp"
    )]
    pub application_name: String,

    /// Enable request ID tracking.
    #[arg(long, env = "BON_CONTENT_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// Default page size for list and search results.
    #[arg(long, env = "BON_CONTENT_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u32,

    /// Maximum page size for list and search results.
    #[arg(long, env = "BON_CONTENT_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: u32,

    /// Rebuild the search index from the store at startup.
    #[arg(long, env = "BON_CONTENT_REINDEX_ON_STARTUP", default_value = "false")]
    pub reindex_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: None,
            search_index_url: None,
            application_name: "bonContentServiceApp".to_string(),
            enable_request_id: true,
            default_page_size: 20,
            max_page_size: 1000,
            reindex_on_startup: false,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the store database path.
    pub fn database_path(&self) -> &str {
        self.database_url.as_deref().unwrap_or("bon-content.db")
    }

    /// Returns the search index database path.
    pub fn search_index_path(&self) -> &str {
        self.search_index_url
            .as_deref()
            .unwrap_or("bon-content-index.db")
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.application_name.is_empty()
            || !self
                .application_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.push(
                "Application name must be non-empty and contain only letters, digits, '-' or '_'"
                    .to_string(),
            );
        }

        if let Some(database) = &self.database_url {
            if self.search_index_url.as_ref() == Some(database) && database != ":memory:" {
                errors.push("Store and search index must use different databases".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, in-memory databases and disables features
    /// that might interfere with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost".to_string(),
            database_url: Some(":memory:".to_string()),
            search_index_url: Some(":memory:".to_string()),
            application_name: "bonContentServiceApp".to_string(),
            enable_request_id: false,
            default_page_size: 10,
            max_page_size: 100,
            reindex_on_startup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.application_name, "bonContentServiceApp");
        assert_eq!(config.database_path(), "bon-content.db");
        assert_eq!(config.search_index_path(), "bon-content-index.db");
        assert!(config.enable_cors);
        assert!(!config.reindex_on_startup);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_invalid_page_sizes() {
        let config = ServerConfig {
            default_page_size: 100,
            max_page_size: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_application_name() {
        let config = ServerConfig {
            application_name: "bad name".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Application name")));
    }

    #[test]
    fn test_validate_shared_database_file() {
        let config = ServerConfig {
            database_url: Some("content.db".to_string()),
            search_index_url: Some("content.db".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(config.database_path(), ":memory:");
        // Port 0 is fine for tests, everything else must hold
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
