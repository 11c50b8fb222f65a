//! Visualizer configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use algoscope_steps::Algorithm;

use crate::error::{Error, Result};

/// Configuration for a visualizer instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisConfig {
    /// HTTP/WebSocket listen address
    pub addr: SocketAddr,

    /// Algorithm selected at startup
    pub algorithm: Algorithm,

    /// Size of generated arrays (clamped to 5–100)
    pub array_size: usize,

    /// Playback speed (clamped to 1–100, higher is faster)
    pub speed: u8,

    /// Seed for deterministic array generation and target picking
    pub seed: Option<u64>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            algorithm: Algorithm::Bubble,
            array_size: 30,
            speed: 50,
            seed: None,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            addr: env_var("ALGOSCOPE_ADDR")?.unwrap_or(defaults.addr),
            algorithm: env_var("ALGOSCOPE_ALGORITHM")?.unwrap_or(defaults.algorithm),
            array_size: env_var("ALGOSCOPE_ARRAY_SIZE")?.unwrap_or(defaults.array_size),
            speed: env_var("ALGOSCOPE_SPEED")?.unwrap_or(defaults.speed),
            seed: env_var("ALGOSCOPE_SEED")?,
        })
    }

    /// Override the listen port, keeping the address.
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }
}

fn env_var<T: FromStr>(key: &'static str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(value) => parse_value(key, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::Config {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VisConfig::default();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.algorithm, Algorithm::Bubble);
        assert_eq!(config.array_size, 30);
        assert_eq!(config.speed, 50);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn port_override() {
        let config = VisConfig::default().with_port(8081);
        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 8081)));
    }

    #[test]
    fn values_parse() {
        assert_eq!(
            parse_value::<Algorithm>("ALGOSCOPE_ALGORITHM", "merge").unwrap(),
            Algorithm::Merge
        );
        assert_eq!(parse_value::<u8>("ALGOSCOPE_SPEED", " 75 ").unwrap(), 75);
        assert_eq!(
            parse_value::<SocketAddr>("ALGOSCOPE_ADDR", "127.0.0.1:9000").unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = parse_value::<u8>("ALGOSCOPE_SPEED", "fast").unwrap_err();
        assert!(matches!(err, Error::Config { key: "ALGOSCOPE_SPEED", .. }));
        assert!(parse_value::<Algorithm>("ALGOSCOPE_ALGORITHM", "bogo").is_err());
    }
}
