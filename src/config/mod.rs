use crate::util::env::{
    get_bool_from_env_or, get_env_or, get_opt_env, get_size_from_env_or, get_vec_from_env_or,
    load_dotenv,
};
use anyhow::{bail, Result};
use derive_more::Display;
use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;

pub mod db;
pub mod storage;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,

    pub static_url: String,
    pub static_path: String,

    pub http: HTTPConfig,
    pub db: DBConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct HTTPConfig {
    pub ip: String,
    pub port: u16,
    pub max_body_size: u64,
    pub request_timeout_secs: u64,
    pub cors: CORSConfig,
}

#[derive(Debug, Clone)]
pub struct DBConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StorageBackend {
    #[display("gcs")]
    Gcs,
    #[display("local")]
    Local,
    #[display("memory")]
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gcs" | "firebase" => Ok(StorageBackend::Gcs),
            "local" | "file" => Ok(StorageBackend::Local),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub credentials_path: String,
    pub local_path: String,
    pub public_base_url: String,
    pub upload_prefix: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CORSConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: u64,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_requests: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        Ok(AppConfig {
            app_name: get_env_or("APP_NAME", "Blogo".to_string())?,

            static_url: get_env_or("STATIC_URL", "/static".to_string())?,
            static_path: get_env_or("STATIC_PATH", "./www".to_string())?,

            http: HTTPConfig::from_env()?,
            db: DBConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            log: LogConfig::from_env()?,
        })
    }

    /// Rejects combinations that would only fail later, at request time.
    pub fn validate(&self) -> Result<()> {
        if self.db.pool_size == 0 {
            bail!("DATABASE_POOL_SIZE must be at least 1");
        }
        if self.http.request_timeout_secs == 0 {
            bail!("HTTP_REQUEST_TIMEOUT_SECS must be at least 1");
        }
        if !self.static_url.starts_with('/') || self.static_url == "/" {
            bail!("STATIC_URL must be a sub path such as '/static'");
        }
        if self.storage.backend == StorageBackend::Gcs && self.storage.bucket.is_empty() {
            bail!("STORAGE_BUCKET is required for the gcs storage backend");
        }
        if self.storage.upload_prefix.trim_matches('/').is_empty() {
            bail!("STORAGE_UPLOAD_PREFIX can not be empty");
        }
        Ok(())
    }
}

impl HTTPConfig {
    pub fn from_env() -> Result<Self> {
        Ok(HTTPConfig {
            ip: get_env_or("HTTP_IP", "127.0.0.1".to_string())?,
            port: get_env_or("HTTP_PORT", 8080)?,
            max_body_size: get_size_from_env_or("HTTP_MAX_BODY_SIZE", 10 * 1024 * 1024)?,
            request_timeout_secs: get_env_or("HTTP_REQUEST_TIMEOUT_SECS", 30)?,
            cors: CORSConfig::from_env()?,
        })
    }
}

impl DBConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DBConfig {
            url: get_env_or("DATABASE_URL", "sqlite://blogo.db?mode=rwc".to_string())?,
            pool_size: get_env_or("DATABASE_POOL_SIZE", 5)?,
            acquire_timeout_secs: get_env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            auto_migrate: get_bool_from_env_or("DATABASE_AUTO_MIGRATE", true)?,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        Ok(StorageConfig {
            backend: get_env_or("STORAGE_BACKEND", StorageBackend::Gcs)?,
            bucket: get_opt_env("STORAGE_BUCKET").unwrap_or_default(),
            credentials_path: get_env_or("STORAGE_CREDENTIALS_PATH", "./credentials.json".to_string())?,
            local_path: get_env_or("STORAGE_LOCAL_PATH", "./uploads".to_string())?,
            public_base_url: get_env_or(
                "STORAGE_PUBLIC_BASE_URL",
                "https://firebasestorage.googleapis.com".to_string(),
            )?,
            upload_prefix: get_env_or("STORAGE_UPLOAD_PREFIX", "uploads".to_string())?,
            timeout_secs: get_env_or("STORAGE_TIMEOUT_SECS", 30)?,
        })
    }
}

impl CORSConfig {
    pub fn from_env() -> Result<Self> {
        Ok(CORSConfig {
            allowed_origins: get_vec_from_env_or("CORS_ALLOWED_ORIGINS", vec![])?,
            allowed_methods: get_vec_from_env_or(
                "CORS_ALLOWED_METHODS",
                strs_to_strings(&["GET", "POST", "PUT", "DELETE", "OPTIONS"]),
            )?,
            allowed_headers: get_vec_from_env_or("CORS_ALLOWED_HEADERS", strs_to_strings(&["Content-Type"]))?,
            allow_credentials: get_bool_from_env_or("CORS_ALLOW_CREDENTIALS", false)?,
            max_age: get_env_or("CORS_MAX_AGE", 86400)?,
        })
    }

    pub fn into_layer(self) -> CorsLayer {
        let wildcard = |values: &[String]| values.iter().any(|v| v == "*");
        let any_wildcard = wildcard(&self.allowed_origins)
            || wildcard(&self.allowed_methods)
            || wildcard(&self.allowed_headers);

        let mut cors = CorsLayer::new();

        cors = if wildcard(&self.allowed_origins) {
            cors.allow_origin(Any)
        } else {
            cors.allow_origin(AllowOrigin::list(convert_vec(&self.allowed_origins)))
        };

        cors = if wildcard(&self.allowed_methods) {
            cors.allow_methods(Any)
        } else {
            cors.allow_methods(AllowMethods::list(convert_vec(&self.allowed_methods)))
        };

        cors = if wildcard(&self.allowed_headers) {
            cors.allow_headers(Any)
        } else {
            cors.allow_headers(AllowHeaders::list(convert_vec(&self.allowed_headers)))
        };

        // tower-http rejects credentials next to a wildcard origin, method or header
        if self.allow_credentials {
            if any_wildcard {
                warn!("CORS_ALLOW_CREDENTIALS ignored: origins, methods and headers must not contain '*'");
            } else {
                cors = cors.allow_credentials(true);
            }
        }

        cors.max_age(Duration::from_secs(self.max_age))
    }
}

impl LogConfig {
    pub fn from_env() -> Result<Self> {
        Ok(LogConfig {
            log_requests: get_bool_from_env_or("LOG_REQUESTS", false)?,
        })
    }
}

fn strs_to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// Values that do not parse are skipped with a warning instead of failing startup.
fn convert_vec<T: FromStr>(strings: &[String]) -> Vec<T>
where
    <T as FromStr>::Err: Debug,
{
    strings
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS value {:?}: {:?}", s, e);
                None
            }
        })
        .collect()
}
