use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5178;
pub const DEFAULT_LITE_BASE_URL: &str = "https://openapi.ai.nc.com/tts/lite/v1/api";
pub const DEFAULT_STANDARD_BASE_URL: &str = "https://openapi.ai.nc.com/tts/standard/v1/api";

/// Base URLs for the two upstream API tiers.
#[derive(Debug, Clone)]
pub struct UpstreamUrls {
    pub lite: String,
    pub standard: String,
}

impl Default for UpstreamUrls {
    fn default() -> Self {
        Self {
            lite: DEFAULT_LITE_BASE_URL.to_string(),
            standard: DEFAULT_STANDARD_BASE_URL.to_string(),
        }
    }
}

/// Relay configuration from environment
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub voices_file: PathBuf,
    pub static_dir: PathBuf,
    pub upstream: UpstreamUrls,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            voices_file: PathBuf::from("./voice.json"),
            static_dir: PathBuf::from("./public"),
            upstream: UpstreamUrls::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("PORT '{}' is not a valid port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            port,
            voices_file: std::env::var("VOICES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.voices_file),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            upstream: UpstreamUrls {
                lite: std::env::var("VARCO_LITE_BASE_URL").unwrap_or(defaults.upstream.lite),
                standard: std::env::var("VARCO_STANDARD_BASE_URL")
                    .unwrap_or(defaults.upstream.standard),
            },
        }
    }

    /// The relay only ever listens on loopback.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_is_loopback() {
        let config = Config {
            port: 9000,
            ..Config::default()
        };
        let addr = config.listen_addr();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn test_default_upstream_urls() {
        let urls = UpstreamUrls::default();
        assert!(urls.lite.contains("/tts/lite/"));
        assert!(urls.standard.contains("/tts/standard/"));
    }
}
