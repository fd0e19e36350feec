use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use service::{FailurePolicy, IdPolicy, WriteSerialization};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CATALOG_PATH: &str = "productos.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            worker_threads: None,
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default)]
    pub id_policy: IdPolicy,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub serialize_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            id_policy: IdPolicy::default(),
            failure_policy: FailurePolicy::default(),
            serialize_writes: false,
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_log_format() -> String { "compact".into() }
fn default_catalog_path() -> String { DEFAULT_CATALOG_PATH.into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise `SERVER_HOST`/`SERVER_PORT`, otherwise defaults.
    /// Only a missing file falls back; a file that fails to parse or validate is an error.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("cannot load {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path must not be empty"));
        }
        Ok(())
    }

    pub fn write_serialization(&self) -> WriteSerialization {
        WriteSerialization::from(self.serialize_writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_fixed_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.path, "productos.json");
        assert_eq!(cfg.storage.id_policy, IdPolicy::Positional);
        assert_eq!(cfg.storage.failure_policy, FailurePolicy::Soft);
        assert_eq!(cfg.storage.write_serialization(), WriteSerialization::None);
    }

    #[test]
    fn storage_section_overrides_policies() {
        let cfg = parse(
            r#"
            [server]
            port = 9000
            worker_threads = 0

            [storage]
            path = "data/products.json"
            id_policy = "next_after_max"
            failure_policy = "strict"
            serialize_writes = true
            "#,
        )
        .unwrap();
        let mut cfg = cfg;
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, None);
        assert_eq!(cfg.storage.path, "data/products.json");
        assert_eq!(cfg.storage.id_policy, IdPolicy::NextAfterMax);
        assert_eq!(cfg.storage.failure_policy, FailurePolicy::Strict);
        assert_eq!(cfg.storage.write_serialization(), WriteSerialization::Serialized);
    }

    #[test]
    fn rejects_port_zero_and_blank_path() {
        let mut cfg = parse("[server]\nport = 0").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
        let mut cfg = parse("[storage]\npath = \"  \"").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn tmp_config(tag: &str, contents: Option<&str>) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("configs_{tag}_{}.toml", std::process::id()));
        if let Some(c) = contents {
            std::fs::write(&path, c).unwrap();
        }
        path
    }

    #[test]
    fn malformed_config_file_is_an_error_not_a_fallback() {
        let path = tmp_config("typo", Some("[storage]\nfailure_policy = \"stric\"\n"));
        std::env::set_var("CONFIG_PATH", &path);
        let res = AppConfig::load_or_env();
        std::env::remove_var("CONFIG_PATH");
        assert!(res.is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let path = tmp_config("port", Some("[server]\nport = 0\n"));
        assert!(AppConfig::load_or_env_from(path.to_str().unwrap()).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let path = tmp_config("absent", None);
        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.storage.path, "productos.json");
        assert_eq!(cfg.storage.failure_policy, FailurePolicy::Soft);
    }

    #[test]
    fn present_config_file_is_used() {
        let path = tmp_config("strict", Some("[storage]\nfailure_policy = \"strict\"\n"));
        let cfg = AppConfig::load_or_env_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.storage.failure_policy, FailurePolicy::Strict);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        assert!(parse("[storage]\nid_policy = \"random\"").is_err());
    }
}
