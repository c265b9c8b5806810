/// Configuration management for the API server
///
/// Configuration is read from environment variables (a `.env` file is loaded
/// first when present). Every variable has a development default.
///
/// # Environment Variables
///
/// - `HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 5000)
/// - `CORS_ORIGIN`: The single origin allowed by CORS (default: http://localhost:3000)
/// - `DB_NAME`: Database name (default: taskdb)
/// - `DB_USER`: Database role (default: postgres)
/// - `DB_PASSWORD`: Database password (default: 0292)
/// - `DB_HOST`: Database host (default: localhost)
/// - `DB_PORT`: Database port (default: 5432)
/// - `DB_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;

use taskhub_shared::db::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Origin allowed to make cross-origin requests
    pub cors_origin: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,

    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                cors_origin: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig::default(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Reads and parses `key`, falling back to `default` when unset
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn string_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse
    /// (e.g. a non-numeric `PORT`).
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        Ok(Self {
            api: ApiConfig {
                host: string_var("HOST", &defaults.api.host),
                port: parse_var("PORT", defaults.api.port)?,
                cors_origin: string_var("CORS_ORIGIN", &defaults.api.cors_origin),
            },
            database: DatabaseConfig {
                database: string_var("DB_NAME", &defaults.database.database),
                username: string_var("DB_USER", &defaults.database.username),
                password: string_var("DB_PASSWORD", &defaults.database.password),
                host: string_var("DB_HOST", &defaults.database.host),
                port: parse_var("DB_PORT", defaults.database.port)?,
                max_connections: parse_var(
                    "DB_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
                ..defaults.database
            },
            log_format: parse_var("LOG_FORMAT", defaults.log_format)?,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 5000);
        assert_eq!(config.api.cors_origin, "http://localhost:3000");
        assert_eq!(config.database.database, "taskdb");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_bind_address() {
        let mut config = Config::default();
        config.api.host = "127.0.0.1".to_string();
        config.api.port = 8080;
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let port: u16 = parse_var("TASKHUB_TEST_SURELY_UNSET_PORT", 4321).unwrap();
        assert_eq!(port, 4321);
    }
}
