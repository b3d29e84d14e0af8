use crate::errors::{AppError, AppResult};
use std::env;
use url::Url;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Connection parameters for the managed backend plus the local listen address.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: Url,
    pub supabase_anon_key: String,
    pub bind_address: String,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = required(&lookup, "SUPABASE_URL")?;
        let supabase_anon_key = required(&lookup, "SUPABASE_ANON_KEY")?;

        // Url::join drops the last path segment unless it ends with a slash
        let normalized = if raw_url.ends_with('/') {
            raw_url
        } else {
            format!("{}/", raw_url)
        };
        let supabase_url = Url::parse(&normalized)
            .map_err(|err| AppError::ConfigError(format!("SUPABASE_URL is invalid: {}", err)))?;
        if supabase_url.cannot_be_a_base() {
            return Err(AppError::ConfigError(
                "SUPABASE_URL must be an absolute http(s) URL".to_string(),
            ));
        }

        let bind_address = lookup("BIND_ADDRESS")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Config {
            supabase_url,
            supabase_anon_key,
            bind_address,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::ConfigError(format!("{} must be set", key))),
    }
}
