//! Server configuration from environment variables.

use kbassist_core::defaults;

/// HTTP server settings.
///
/// | Variable | Default |
/// |----------|---------|
/// | HOST | 0.0.0.0 |
/// | PORT | 3000 |
/// | MAX_BODY_BYTES | 2 MiB |
/// | ALLOWED_ORIGINS | unset (any origin) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// CORS origin whitelist. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            max_body_bytes: defaults::MAX_BODY_BYTES,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fallback = Self::default();
        Self {
            host: lookup("HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback.port),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback.max_body_bytes),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .unwrap_or(fallback.allowed_origins),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
