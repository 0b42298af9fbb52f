//! Server configuration — a TOML file resolved from a context name or path.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,

    /// Bound on how long a store call may wait for the database lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Token signing secret.
    pub secret: String,

    /// Access token lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Browser origins allowed to call the API. Empty means any origin
    /// (development mode).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_expire_secs() -> u64 {
    1_800 // 30 minutes
}

impl ServerConfig {
    /// Resolve a context name to `/etc/worldvote/<name>.toml`. Anything
    /// containing `/` or `.` is treated as a literal path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/worldvote/{name_or_path}.toml"))
        }
    }

    /// Load and parse the configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Path of the SQLite database inside the data directory.
    pub fn sqlite_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("worldvote.sqlite")
    }
}
