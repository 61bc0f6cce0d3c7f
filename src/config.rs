//! Configuration management for Expediente Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory where uploaded files are stored
    pub upload_dir: PathBuf,
    /// Lowercase file extensions accepted for upload
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("./uploads"),
                allowed_extensions: vec!["pdf".to_string()],
            },
            database: DatabaseConfig {
                url: "sqlite:./expediente.db".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .unwrap_or(5000),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./uploads")),
                allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                    .map(|raw| {
                        raw.split(',')
                            .map(|ext| ext.trim().to_ascii_lowercase())
                            .filter(|ext| !ext.is_empty())
                            .collect()
                    })
                    .unwrap_or_else(|_| vec!["pdf".to_string()]),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:./expediente.db".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_only_pdf() {
        let config = Config::default();
        assert_eq!(config.storage.allowed_extensions, vec!["pdf"]);
        assert_eq!(config.server.port, 5000);
    }
}
