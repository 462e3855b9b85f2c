use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "config/server.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid upstream URL {url}: {reason}")]
    Upstream { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin of the detection service the `/api` routes forward to.
    pub upstream_url: String,
    pub frontend_dir: PathBuf,
    pub max_payload_mb: usize,
    /// Unset means upstream requests never time out.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let frontend_dir = match std::env::var("CARGO_MANIFEST_DIR") {
            Ok(manifest_dir) => PathBuf::from(format!("{}/../frontend/dist", manifest_dir)),
            Err(_) => PathBuf::from("/usr/src/app/frontend/dist"),
        };
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            upstream_url: "http://localhost:5000".to_string(),
            frontend_dir,
            max_payload_mb: 50,
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Reads `.env`, the YAML file named by `SERVER_CONFIG` (if present),
    /// then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = std::env::var("SERVER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            log::info!("Loading server config from {}", path);
            Self::from_file(Path::new(&path))?
        } else {
            log::info!("No config file at {}, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.upstream()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }
        if let Some(upstream) = lookup("DETECTOR_UPSTREAM_URL") {
            self.upstream_url = upstream;
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("MAX_PAYLOAD_MB") {
            self.max_payload_mb = limit.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAX_PAYLOAD_MB",
                value: limit,
            })?;
        }
        Ok(())
    }

    /// The upstream origin, normalised to end in `/` so endpoint paths
    /// join beneath it.
    pub fn upstream(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::Upstream {
            url: self.upstream_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.upstream_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn payload_limit(&self) -> usize {
        self.max_payload_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ServerConfig::from_yaml("port: 9000\nupstream_url: http://detector:5000\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.upstream_url, "http://detector:5000");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_payload_mb, 50);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("PORT", "7000"),
            ("DETECTOR_UPSTREAM_URL", "https://api.example.com/v1"),
            ("MAX_PAYLOAD_MB", "5"),
        ]
        .into_iter()
        .collect();
        let mut config = ServerConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:7000");
        assert_eq!(config.payload_limit(), 5 * 1024 * 1024);
        assert_eq!(config.upstream().unwrap().as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn bad_port_is_reported() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn upstream_must_be_http() {
        let config = ServerConfig {
            upstream_url: "ftp://files.example.com".into(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.upstream(), Err(ConfigError::Upstream { .. })));

        let config = ServerConfig {
            upstream_url: "not a url".into(),
            ..ServerConfig::default()
        };
        assert!(config.upstream().is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            ServerConfig::from_yaml("port: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
