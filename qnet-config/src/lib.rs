//! # qnet Configuration System
//!
//! Turns network descriptions into validated
//! [`NetworkDefinition`](qnet_core::network::NetworkDefinition)s.
//!
//! ## Formats
//! - **YAML** (`.yaml`/`.yml`): loaded with figment, `QNET_*` environment
//!   variables override file values, fields are checked with `validator`.
//! - **Text** (any other extension): the line-oriented `q`/`d:`/`s:`/`r:`/`f:`
//!   format.
//!
//! Either way the result goes through the core network builder, so a
//! definition that loads is ready to simulate.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use qnet_core::network::NetworkDefinition;

mod error;
mod network;
pub mod text;
mod validation;

pub use error::ConfigError;
pub use network::{FirstArrivalConfig, NetworkConfig, RangeConfig, RouteConfig, StationConfig, ENV_PREFIX};

/// Description format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Text,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SourceFormat::Yaml
            }
            _ => SourceFormat::Text,
        }
    }
}

/// Loads and validates a network description from `path`.
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<NetworkDefinition, ConfigError> {
    let path = path.as_ref();
    match SourceFormat::from_path(path) {
        SourceFormat::Yaml => NetworkConfig::load_from_path(path)?.to_definition(),
        SourceFormat::Text => text::parse_file(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("net.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("net.YML")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("queues")), SourceFormat::Text);
        assert_eq!(SourceFormat::from_path(Path::new("net.txt")), SourceFormat::Text);
    }

    #[test]
    fn test_missing_yaml_file() {
        assert!(matches!(
            load_network("/no/such/network.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
