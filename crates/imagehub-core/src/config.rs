//! Configuration module
//!
//! Settings for the HTTP server, database pool, authentication, the local asset
//! store and thumbnail derivation, loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 10;
const THUMBNAIL_MAX_DIMENSION: u32 = 150;
const UPLOAD_DIR: &str = "./uploads";

/// Server, database and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Asset store and thumbnail settings
#[derive(Clone, Debug)]
pub struct AssetConfig {
    pub upload_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub assets: AssetConfig,
}

#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ServiceConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.inner().base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.inner().assets.upload_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().assets.max_file_size_bytes
    }

    pub fn thumbnail_max_width(&self) -> u32 {
        self.inner().assets.thumbnail_max_width
    }

    pub fn thumbnail_max_height(&self) -> u32 {
        self.inner().assets.thumbnail_max_height
    }
}

impl ServiceConfig {
    /// Builds the configuration from a variable lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let base = BaseConfig {
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(SERVER_PORT),
            cors_origins,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expiry_hours: lookup("JWT_EXPIRY_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment,
        };

        let assets = AssetConfig {
            upload_dir: PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| UPLOAD_DIR.to_string())),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            thumbnail_max_width: lookup("THUMBNAIL_MAX_WIDTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(THUMBNAIL_MAX_DIMENSION),
            thumbnail_max_height: lookup("THUMBNAIL_MAX_HEIGHT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(THUMBNAIL_MAX_DIMENSION),
        };

        Ok(Self { base, assets })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.base.database_url.starts_with("postgresql://")
            && !self.base.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.assets.thumbnail_max_width == 0 || self.assets.thumbnail_max_height == 0 {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_MAX_WIDTH and THUMBNAIL_MAX_HEIGHT must be greater than zero"
            ));
        }

        if self.assets.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        Ok(())
    }
}
