use std::{fmt, path::{Path, PathBuf}, str::FromStr};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REGION: &str = "ap-northeast-1";
pub const DEFAULT_TABLE_NAME: &str = "kjtxt-translate-tb";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            worker_threads: None,
            log_format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format `{other}` (expected compact or json)")),
        }
    }
}

/// Which record store the service reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    #[serde(alias = "dynamo")]
    DynamoDb,
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::DynamoDb => f.write_str("dynamodb"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown store backend `{other}` (expected dynamodb or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub region: String,
    pub table_name: String,
    /// Override for DynamoDB Local or other compatible endpoints.
    pub endpoint_url: Option<String>,
    /// Attribute holding the source text (the table's partition key).
    pub key_attribute: String,
    /// Attribute holding the translated text.
    pub value_attribute: String,
    /// JSON file used to seed the in-memory backend.
    pub seed_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            region: DEFAULT_REGION.into(),
            table_name: DEFAULT_TABLE_NAME.into(),
            endpoint_url: None,
            key_attribute: "skj".into(),
            value_attribute: "jkj".into(),
            seed_path: None,
        }
    }
}

/// Load the config file named by `CONFIG_PATH`, falling back to `config.toml`.
///
/// An explicit `CONFIG_PATH` must exist; the implicit default may be absent,
/// in which case built-in defaults are used.
pub fn load_default() -> Result<AppConfig> {
    match std::env::var("CONFIG_PATH") {
        Ok(path) if !path.trim().is_empty() => load_from_file(&path),
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        _ => Ok(AppConfig::default()),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {path}"))?;
    let cfg: AppConfig = toml::from_str(&content)
        .with_context(|| format!("invalid config file {path}"))?;
    Ok(cfg)
}

impl AppConfig {
    /// File, then process environment, then normalization.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup`. Blank values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow!("PORT must be an integer in 1..=65535, got `{port}`"))?;
        }
        if let Some(threads) = get("TOKIO_WORKER_THREADS") {
            let n = threads
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow!("TOKIO_WORKER_THREADS must be a positive integer, got `{threads}`"))?;
            self.server.worker_threads = Some(n);
        }
        if let Some(format) = get("LOG_FORMAT") {
            self.server.log_format = format.parse()?;
        }

        if let Some(backend) = get("STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        if let Some(region) = get("REGION") {
            self.store.region = region;
        }
        if let Some(table) = get("DB_TABLE_NAME").or_else(|| get("TABLE_NAME")) {
            self.store.table_name = table;
        }
        if let Some(endpoint) = get("DYNAMODB_ENDPOINT") {
            self.store.endpoint_url = Some(endpoint);
        }
        if let Some(seed) = get("STORE_SEED_PATH") {
            self.store.seed_path = Some(PathBuf::from(seed));
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        // 0 表示交由 tokio 决定线程数
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.key_attribute.trim().is_empty() || self.value_attribute.trim().is_empty() {
            return Err(anyhow!("store.key_attribute and store.value_attribute must not be empty"));
        }
        if self.backend == StoreBackend::DynamoDb {
            if self.table_name.trim().is_empty() {
                return Err(anyhow!("store.table_name is empty; set it in the config file or DB_TABLE_NAME"));
            }
            if self.region.trim().is_empty() {
                return Err(anyhow!("store.region is empty; set it in the config file or REGION"));
            }
            if let Some(url) = &self.endpoint_url {
                let lower = url.to_lowercase();
                if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                    return Err(anyhow!("store.endpoint_url must start with http:// or https://"));
                }
            }
        }
        Ok(())
    }
}
