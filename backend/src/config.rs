use std::env;
use std::net::SocketAddr;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_TABLE: &str = "study-record";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://study_records.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: Url,
    pub api_key: String,
    pub table: String,
}

#[derive(Clone, Debug)]
pub enum StoreBackend {
    Rest(RestConfig),
    Sqlite { database_url: String },
    Memory,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let backend_name = get("STORE_BACKEND").unwrap_or_else(|| "rest".to_string());
        let backend = match backend_name.to_ascii_lowercase().as_str() {
            "rest" => {
                let raw_url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                let base_url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
                    key: "SUPABASE_URL",
                    value: raw_url.clone(),
                    reason: e.to_string(),
                })?;
                if base_url.cannot_be_a_base() {
                    return Err(ConfigError::Invalid {
                        key: "SUPABASE_URL",
                        value: raw_url,
                        reason: "not a base URL".to_string(),
                    });
                }
                let api_key =
                    get("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
                let table = get("RECORD_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());
                StoreBackend::Rest(RestConfig {
                    base_url,
                    api_key,
                    table,
                })
            }
            "sqlite" => StoreBackend::Sqlite {
                database_url: get("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            },
            "memory" => StoreBackend::Memory,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: backend_name,
                    reason: "expected one of rest, sqlite, memory".to_string(),
                });
            }
        };

        Ok(Self { bind_addr, backend })
    }
}
