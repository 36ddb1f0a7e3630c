use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

static LOAD_ENV: OnceLock<()> = OnceLock::new();

/// Loads environment variables from `.env` files, once per process.
///
/// Order of precedence (later files do not override variables that are already set):
/// 1. `.env`
/// 2. `.env.dev` in debug builds, `.env.prod` in release builds
/// 3. `.env.local`
pub fn load_dotenv() {
    LOAD_ENV.get_or_init(|| {
        dotenv().ok();

        let env_file = if cfg!(debug_assertions) { ".env.dev" } else { ".env.prod" };
        if Path::new(env_file).exists() {
            dotenvy::from_filename(env_file).ok();
        }

        if Path::new(".env.local").exists() {
            dotenvy::from_filename(".env.local").ok();
        }
    });
}

/// Retrieves a value from an environment variable and parses it into type `T`.
/// If the variable is not set, returns `default`. If parsing fails, returns an error.
pub fn get_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| anyhow!("Failed to parse {} env var: {:?}", key, e)),
        Err(_) => Ok(default),
    }
}

/// Like [`get_env_or`], but an empty value counts as unset.
pub fn get_opt_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Retrieves a comma separated list from an environment variable.
pub fn get_vec_from_env_or<T>(key: &str, default: Vec<T>) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    match env::var(key) {
        Ok(val) => val
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(Into::into)
                    .context(format!("Failed to parse {} env var", key))
            })
            .collect(),
        Err(_) => Ok(default),
    }
}

/// Retrieves a byte size, supporting K, M, G suffixes (case-insensitive).
pub fn get_size_from_env_or(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(val) => parse_size(val.trim()).ok_or(anyhow!("Failed to parse {} env var", key)),
        Err(_) => Ok(default),
    }
}

/// Recognizes `true/1/yes/on` and `false/0/no/off`.
pub fn get_bool_from_env_or(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("Failed to parse {} env var as `bool`", key)),
        },
        Err(_) => Ok(default),
    }
}

/// Converts a size string such as `512`, `3k` or `10M` to a number of bytes.
pub fn parse_size(size_str: &str) -> Option<u64> {
    if size_str.is_empty() {
        return None;
    }

    let size_str = size_str.to_lowercase();

    let (num_part, unit_multiplier) = match size_str.chars().last() {
        Some('k') => (&size_str[..size_str.len() - 1], 1024u64),
        Some('m') => (&size_str[..size_str.len() - 1], 1024u64 * 1024),
        Some('g') => (&size_str[..size_str.len() - 1], 1024u64 * 1024 * 1024),
        _ => (size_str.as_str(), 1),
    };

    num_part
        .parse::<u64>()
        .ok()
        .and_then(|num| num.checked_mul(unit_multiplier))
}
