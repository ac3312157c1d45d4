//! Client settings and direction table loading.

use std::fs;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::geometry::DirectionTable;

/// Default puzzle service endpoint.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9080";

/// Default bound on every remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base url {0} cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid direction table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("direction table has no edges")]
    EmptyTable,
}

/// Where and how the client talks to the puzzle service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(base_url.to_string()));
        }
        Ok(Self { base_url, timeout })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Parses a direction table from its JSON form:
/// `{"version": 1, "edges": {"501": "up", ...}}`.
pub fn parse_direction_table(json: &str) -> Result<DirectionTable, ConfigError> {
    let table: DirectionTable = serde_json::from_str(json)?;
    if table.is_empty() {
        return Err(ConfigError::EmptyTable);
    }
    Ok(table)
}

/// Reads a direction table file, or returns the built-in table when no path
/// is given.
pub fn load_direction_table(path: Option<&Path>) -> Result<DirectionTable, ConfigError> {
    let Some(path) = path else {
        return Ok(DirectionTable::default());
    };
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = parse_direction_table(&json)?;
    log::info!(
        "loaded direction table v{} ({} edges) from {}",
        table.version,
        table.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9080/");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ClientConfig::new("not a url", DEFAULT_TIMEOUT),
            Err(ConfigError::BaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("mailto:someone@example.com", DEFAULT_TIMEOUT),
            Err(ConfigError::OpaqueBaseUrl(_))
        ));
    }

    #[test]
    fn test_parse_direction_table() {
        let table = parse_direction_table(
            r#"{"version": 3, "edges": {"1": "up", "2": "right", "3": "down", "4": "left"}}"#,
        )
        .unwrap();
        assert_eq!(table.version, 3);
        assert_eq!(table.direction(4), Some(Direction::Left));
        assert_eq!(table.direction(501), None);
    }

    #[test]
    fn test_parse_direction_table_errors() {
        assert!(matches!(
            parse_direction_table(r#"{"version": 1, "edges": {}}"#),
            Err(ConfigError::EmptyTable)
        ));
        assert!(matches!(
            parse_direction_table(r#"{"version": 1, "edges": {"1": "sideways"}}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_path_uses_builtin_table() {
        assert_eq!(load_direction_table(None).unwrap(), DirectionTable::default());
        assert!(matches!(
            load_direction_table(Some(Path::new("/nonexistent/directions.json"))),
            Err(ConfigError::Io { .. })
        ));
    }
}
