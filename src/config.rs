//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::store::CacheOptions;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime in seconds of every cached entry
    pub cache_ttl: u64,
    /// Interval in seconds between expiry sweeps
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Collapse concurrent cache misses on one key into a single store fetch
    pub single_flight: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Cache entry TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SINGLE_FLIGHT` - `true`/`false` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            single_flight: parse_var("SINGLE_FLIGHT").unwrap_or(defaults.single_flight),
        }
    }

    /// Cache settings for the caching decorator.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            ttl: Duration::from_secs(self.cache_ttl),
            sweep_interval: Duration::from_secs(self.sweep_interval),
            single_flight: self.single_flight,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 300,
            sweep_interval: 60,
            server_port: 3000,
            single_flight: false,
        }
    }
}
