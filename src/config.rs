use std::{
    env,
    fmt::Display,
    net::{AddrParseError, IpAddr},
    num::ParseIntError,
    path::PathBuf,
    str::FromStr,
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Session data is held per portal process, so it only listens locally
/// unless told otherwise.
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_DATA_PATH: &str = "data/durable.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host: {0}")]
    Host(#[from] AddrParseError),
    #[error("invalid port: {0}")]
    Port(#[from] ParseIntError),
    #[error("invalid backend url: {0}")]
    BackendUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub backend_url: Url,
    /// File behind the durable storage scope.
    pub data_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load(&lookup, "PORTAL_HOST", DEFAULT_HOST)?,
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            backend_url: try_load(&lookup, "PORTAL_BACKEND_URL", DEFAULT_BACKEND_URL)?,
            data_path: PathBuf::from(
                lookup("PORTAL_DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            ),
        })
    }
}

/// Parses `key`, falling back to `default` when it is unset or invalid.
fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, T::Err>
where
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().or_else(|err| {
            warn!("Invalid {key} value {value:?}: {err}, using default: {default}");
            default.parse()
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default.parse()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.host.is_loopback());
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.data_path, PathBuf::from("data/durable.json"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("PORTAL_HOST", "localhost:80"),
            ("PORT", "eighty"),
            ("PORTAL_BACKEND_URL", "not a url"),
        ]))
        .unwrap();
        assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend_url.as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::from_lookup(lookup(&[
            ("PORTAL_HOST", "0.0.0.0"),
            ("PORT", "9100"),
            ("PORTAL_BACKEND_URL", "http://backend.internal:7000/"),
            ("PORTAL_DATA_PATH", "/tmp/portal.json"),
        ]))
        .unwrap();
        assert!(config.host.is_unspecified());
        assert_eq!(config.port, 9100);
        assert_eq!(config.backend_url.host_str(), Some("backend.internal"));
        assert_eq!(config.data_path, PathBuf::from("/tmp/portal.json"));
    }
}
