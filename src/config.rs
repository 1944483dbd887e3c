// ABOUTME: Runtime configuration from command-line flags backed by environment variables
// ABOUTME: Loads the .env file, validates settings and initializes tracing

use anyhow::{bail, Result};
use clap::{builder::BoolishValueParser, Args, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::store::{DocumentStore, MemoryStore, MongoStore};

pub const DEFAULT_JWT_SECRET: &str = "medicaps-exchange-programs-secret-key-2025";
pub const DEFAULT_CORS_ORIGINS: &str = "https://io.medicaps.ac.in,http://localhost:3000,http://127.0.0.1:3000,http://localhost:3001,http://127.0.0.1:3001,*";

/// Where content is stored. Shared by the server and the admin tool.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// MongoDB connection string
    #[arg(long, env = "MONGO_URL", hide_env_values = true)]
    pub mongo_url: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "medicapsoia")]
    pub db_name: String,

    /// Keep all data in process memory instead of MongoDB
    #[arg(long, env = "MEMORY_STORE", value_parser = BoolishValueParser::new())]
    pub memory_store: bool,
}

impl StoreArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.memory_store && self.mongo_url.as_deref().map_or(true, str::is_empty) {
            bail!(
                "MONGO_URL is not set. Create a .env file with MONGO_URL and DB_NAME \
                 (for example MONGO_URL=mongodb://localhost:27017), or pass --memory-store"
            );
        }
        Ok(())
    }

    pub async fn connect(&self) -> Result<Arc<dyn DocumentStore>> {
        if self.memory_store {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            return Ok(Arc::new(MemoryStore::new()));
        }
        let url = self.mongo_url.as_deref().unwrap_or_default();
        let store = MongoStore::connect(url, &self.db_name).await?;
        tracing::info!("Connected to MongoDB database {}", self.db_name);
        Ok(Arc::new(store))
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "oia-backend", version)]
#[command(about = "HTTP API for the Office of International Affairs website")]
pub struct Config {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Secret used to sign admin access tokens
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true, default_value = DEFAULT_JWT_SECRET)]
    pub jwt_secret: String,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Root directory for uploaded images
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Allowed CORS origins, comma separated; `*` allows any origin
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',', default_value = DEFAULT_CORS_ORIGINS)]
    pub cors_origins: Vec<String>,

    /// Access token lifetime in minutes
    #[arg(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES", default_value = "60")]
    pub token_ttl_minutes: i64,

    /// Largest accepted request body for uploads, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "10485760")]
    pub max_upload_bytes: usize,

    /// Skip inserting sample data on startup
    #[arg(long, env = "SKIP_SEED", value_parser = BoolishValueParser::new())]
    pub no_seed: bool,

    /// Username of the default admin created on first start
    #[arg(long, env = "SEED_ADMIN_USERNAME", default_value = "medicaps_admin_2025")]
    pub seed_admin_username: String,

    /// Password of the default admin created on first start
    #[arg(
        long,
        env = "SEED_ADMIN_PASSWORD",
        hide_env_values = true,
        default_value = "MediCaps$Secure#2025!Exchange@Admin"
    )]
    pub seed_admin_password: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        if self.token_ttl_minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }
        if self.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be positive");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o.trim() == "*")
    }
}

/// Loads `.env` from the working directory unless running on Render.
pub fn load_env_file() -> Option<PathBuf> {
    if std::env::var_os("RENDER").is_some() {
        return None;
    }
    dotenvy::dotenv().ok()
}

pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_needs_no_url() {
        let config = Config::parse_from(["oia-backend", "--memory-store", "--port", "8001"]);
        assert!(config.validate().is_ok());
        assert!(config.bind_address().ends_with(":8001"));
    }

    #[test]
    fn test_mongo_url_required_without_memory_store() {
        let config = Config::parse_from(["oia-backend", "--mongo-url", ""]);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("MONGO_URL"));
    }

    #[test]
    fn test_cors_origins_split_on_commas() {
        let config = Config::parse_from([
            "oia-backend",
            "--memory-store",
            "--cors-origins",
            "http://localhost:3000,https://io.medicaps.ac.in",
        ]);
        assert_eq!(config.cors_origins.len(), 2);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_rejects_non_positive_token_ttl() {
        let config = Config::parse_from([
            "oia-backend",
            "--memory-store",
            "--token-ttl-minutes",
            "0",
        ]);
        assert!(config.validate().is_err());
    }
}
