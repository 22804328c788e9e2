use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Секрет HS256 для проверки bearer токенов.
    /// Если не задан - берется из JWT_SECRET.
    pub jwt_secret: Option<String>,
}

/// Настройки импорта из файлов
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub has_headers: bool,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Сколько задач импорта выполняется одновременно
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Через сколько строк публикуется снимок прогресса
    #[serde(default = "default_progress_every")]
    pub progress_every: u32,
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
    /// Сколько часов хранится статус завершенной задачи
    #[serde(default = "default_status_ttl_hours")]
    pub status_ttl_hours: i64,
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_headers: false,
            max_upload_bytes: default_max_upload_bytes(),
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            progress_every: default_progress_every(),
            insert_batch_size: default_insert_batch_size(),
            status_ttl_hours: default_status_ttl_hours(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_delimiter() -> char {
    ';'
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_workers() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    32
}

fn default_progress_every() -> u32 {
    10
}

fn default_insert_batch_size() -> usize {
    500
}

fn default_status_ttl_hours() -> i64 {
    24
}

fn default_cleanup_interval_seconds() -> u64 {
    600
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[import]
delimiter = ";"
has_headers = false
workers = 2
status_ttl_hours = 24
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    // If absolute path, use as is
    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    // If relative path, resolve it relative to the executable directory
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

/// Секрет для JWT: config.toml, затем переменная окружения JWT_SECRET
pub fn resolve_jwt_secret(config: &Config) -> Option<String> {
    config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.import.delimiter, ';');
        assert_eq!(config.import.workers, 2);
        assert_eq!(config.import.status_ttl_hours, 24);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "/tmp/app.db"

            [import]
            delimiter = ","
            "#,
        )
        .unwrap();
        assert_eq!(config.import.delimiter, ',');
        assert!(!config.import.has_headers);
        assert_eq!(config.import.insert_batch_size, 500);
        assert_eq!(config.import.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/app.db")
        );
    }
}
