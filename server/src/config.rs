//! Listener configuration read from the environment.

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid HOST value `{value}`: {source}")]
    InvalidHost {
        value: String,
        source: AddrParseError,
    },

    #[error("invalid PORT value `{value}`: {source}")]
    InvalidPort {
        value: String,
        source: ParseIntError,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Read `HOST` and `PORT`, falling back to `127.0.0.1:3000`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup("HOST") {
            config.host = value
                .parse()
                .map_err(|source| ConfigError::InvalidHost { value, source })?;
        }
        if let Some(value) = lookup("PORT") {
            config.port = value
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
