//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::cache::CacheConfig;
use crate::efa::EfaConfig;
use crate::persistence::PostgisConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// A configuration variable that was set but could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub efa: EfaConfig,
    pub cache: CacheConfig,

    /// `None` disables stop persistence
    pub postgis: Option<PostgisConfig>,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// | Variable            | Default                                 |
    /// |---------------------|-----------------------------------------|
    /// | `BIND_ADDR`         | `0.0.0.0:8080`                          |
    /// | `KVV_BASE_URL`      | `https://projekte.kvv-efa.de/sl3-alone` |
    /// | `KVV_TIMEOUT_SECS`  | `10`                                    |
    /// | `CACHE_TTL_SECS`    | `30`                                    |
    /// | `CACHE_MAX_ENTRIES` | `10000`                                 |
    /// | `DATABASE_URL`      | unset (no persistence)                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(
            "BIND_ADDR",
            var("BIND_ADDR").as_deref().unwrap_or(DEFAULT_BIND_ADDR),
            "socket address",
        )?;

        let mut efa = EfaConfig::default();
        if let Some(url) = var("KVV_BASE_URL") {
            efa = efa.with_base_url(url.trim());
        }
        if let Some(raw) = var("KVV_TIMEOUT_SECS") {
            efa = efa.with_timeout(parse_or("KVV_TIMEOUT_SECS", &raw, "number of seconds")?);
        }

        let mut cache = CacheConfig::default();
        if let Some(raw) = var("CACHE_TTL_SECS") {
            let secs: u64 = parse_or("CACHE_TTL_SECS", &raw, "number of seconds")?;
            cache = cache.with_ttl(Duration::from_secs(secs));
        }
        if let Some(raw) = var("CACHE_MAX_ENTRIES") {
            cache = cache.with_max_capacity(parse_or("CACHE_MAX_ENTRIES", &raw, "entry count")?);
        }

        let postgis = var("DATABASE_URL").map(PostgisConfig::new);

        Ok(Self {
            bind_addr,
            efa,
            cache,
            postgis,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value: raw.to_string(),
    })
}
