//! Server configuration
//!
//! Configuration comes from an optional JSON file; every field has a default,
//! and the binary applies CLI overrides on top.

use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ServerError, ServerResult};
use crate::static_files::{ContentTypes, FsResourceStore};

/// Complete Kite server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KiteConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server hostname
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Directory static resources are served from
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,

    /// Maximum request body size in bytes (default: 16MB)
    #[serde(default = "default_max_body_size")]
    pub max_request_body_size: usize,

    /// Time allowed to serve one connection, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum number of request headers
    #[serde(default = "default_max_headers")]
    pub max_headers: usize,

    /// Maximum size of the request head in bytes
    #[serde(default = "default_max_header_size")]
    pub max_header_size: usize,

    /// Extra extension -> Content-Type mappings, merged over the built-ins
    #[serde(default)]
    pub content_types: HashMap<String, String>,
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            hostname: default_hostname(),
            static_root: default_static_root(),
            max_request_body_size: default_max_body_size(),
            request_timeout_secs: default_request_timeout(),
            max_headers: default_max_headers(),
            max_header_size: default_max_header_size(),
            content_types: HashMap::new(),
        }
    }
}

impl KiteConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ServerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> ServerResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> ServerResult<()> {
        if self.port == 0 {
            return Err(ServerError::Config("Port must be > 0".to_string()));
        }
        if self.hostname.is_empty() {
            return Err(ServerError::Config("Hostname cannot be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::Config("Request timeout must be > 0".to_string()));
        }
        if self.max_headers == 0 {
            return Err(ServerError::Config("Header limit must be > 0".to_string()));
        }
        if self.max_header_size == 0 {
            return Err(ServerError::Config("Header size limit must be > 0".to_string()));
        }
        if let Some(ext) = self.content_types.keys().find(|ext| ext.is_empty()) {
            return Err(ServerError::Config(format!(
                "Content type extension cannot be empty (got {:?})",
                ext
            )));
        }
        self.socket_addr().map(|_| ())
    }

    /// Get the address to bind
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let addr = format!("{}:{}", self.hostname, self.port);
        addr.parse()
            .map_err(|e| ServerError::Config(format!("Invalid address '{}': {}", addr, e)))
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Static resource store for `static_root`, with `content_types` merged
    /// over the built-in table
    pub fn static_store(&self) -> FsResourceStore {
        let mut content_types = ContentTypes::default();
        content_types.extend(self.content_types.iter());
        FsResourceStore::with_content_types(self.static_root.clone(), content_types)
    }
}

// Default function values for serde
fn default_port() -> u16 { 8080 }
fn default_hostname() -> String { "127.0.0.1".to_string() }
fn default_static_root() -> PathBuf { PathBuf::from("static") }
fn default_max_body_size() -> usize { 16 * 1024 * 1024 }
fn default_request_timeout() -> u64 { 30 }
fn default_max_headers() -> usize { 100 }
fn default_max_header_size() -> usize { 8 * 1024 }

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = KiteConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.hostname, "127.0.0.1");
        assert_eq!(config.static_root, PathBuf::from("static"));
        assert_eq!(config.max_request_body_size, 16 * 1024 * 1024);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_headers, 100);
        assert_eq!(config.max_header_size, 8192);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_static_store_merges_content_types() {
        use crate::static_files::StaticResourceStore;

        let json = r#"{"static_root": "/srv", "content_types": {"md": "text/markdown"}}"#;
        let config = KiteConfig::from_json(json).unwrap();
        let store = config.static_store();

        assert_eq!(store.root(), Path::new("/srv"));
        assert_eq!(store.content_type_for("/README.md"), "text/markdown");
        assert_eq!(store.content_type_for("/index.html"), "text/html;charset=utf-8");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            KiteConfig::from_json(r#"{"port": 9000, "content_types": {"svg": "image/svg+xml"}}"#)
                .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.hostname, "127.0.0.1");
        assert_eq!(
            config.content_types.get("svg").map(String::as_str),
            Some("image/svg+xml")
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hostname": "0.0.0.0", "static_root": "/srv/www"}}"#).unwrap();

        let config = KiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.static_root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = KiteConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = KiteConfig::from_json("{port: }").unwrap_err();
        assert!(matches!(err, ServerError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));

        let err = KiteConfig::from_json(r#"{"port": "eighty"}"#).unwrap_err();
        assert!(matches!(err, ServerError::Serialization(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = KiteConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = KiteConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = KiteConfig::default();
        config.hostname = "not a host".to_string();
        assert!(config.validate().is_err());

        let mut config = KiteConfig::default();
        config.content_types.insert(String::new(), "text/plain".to_string());
        assert!(config.validate().is_err());
    }
}
