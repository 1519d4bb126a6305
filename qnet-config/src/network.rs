//! YAML network description.
//!
//! ```yaml
//! stations:
//!   - name: Q1
//!     servers: 1
//!     capacity: 5          # omit for an unbounded station
//!     arrival: { min: 2.0, max: 4.0 }
//!     service: { min: 3.0, max: 5.0 }
//!     routes:
//!       - { to: exit, probability: 1.0 }
//! seeds: [1234]
//! random_budget: 100000
//! first_arrivals:
//!   - { station: Q1, time: 2.0 }
//! ```

use std::path::Path;

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use qnet_core::network::{NetworkBuilder, NetworkDefinition};
use qnet_core::node::{Capacity, TimeRange};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::validation;
use crate::ConfigError;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "QNET_";

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct NetworkConfig {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub stations: Vec<StationConfig>,

    /// One independent run per seed.
    #[validate(length(min = 1))]
    pub seeds: Vec<i64>,

    /// Pseudo-random draws each run may consume.
    #[validate(range(min = 1))]
    pub random_budget: u64,

    #[validate(length(min = 1))]
    #[validate(nested)]
    pub first_arrivals: Vec<FirstArrivalConfig>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct StationConfig {
    #[validate(custom(function = validation::validate_station_name))]
    pub name: String,

    #[validate(range(min = 1))]
    pub servers: u32,

    /// `None` means unbounded.
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Only needed for stations that receive external arrivals.
    #[serde(default)]
    #[validate(nested)]
    pub arrival: Option<RangeConfig>,

    #[validate(nested)]
    pub service: RangeConfig,

    #[validate(length(min = 1))]
    #[validate(nested)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, Copy, PartialEq)]
pub struct RangeConfig {
    #[validate(range(min = 0.0))]
    pub min: f64,
    #[validate(range(min = 0.0))]
    pub max: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct RouteConfig {
    #[validate(custom(function = validation::validate_destination))]
    pub to: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub probability: f64,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct FirstArrivalConfig {
    #[validate(custom(function = validation::validate_station_name))]
    pub station: String,
    #[validate(range(min = 0.0))]
    pub time: f64,
}

impl From<RangeConfig> for TimeRange {
    fn from(range: RangeConfig) -> Self {
        TimeRange::new(range.min, range.max)
    }
}

impl NetworkConfig {
    /// Loads a YAML description, applying `QNET_*` environment overrides
    /// (e.g. `QNET_RANDOM_BUDGET=5000`).
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "loading YAML network description");

        Self::extract(
            Figment::new()
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Parses a YAML description from memory, without environment overrides.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::extract(Figment::new().merge(Yaml::string(yaml)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    pub fn to_definition(&self) -> Result<NetworkDefinition, ConfigError> {
        let mut builder = NetworkBuilder::new();
        for station in &self.stations {
            let capacity = station.capacity.map_or(Capacity::Unbounded, Capacity::Finite);
            builder.add_station(
                station.name.clone(),
                station.servers,
                capacity,
                station.arrival.map(TimeRange::from),
                station.service.into(),
            )?;
        }
        for station in &self.stations {
            for route in &station.routes {
                builder.add_route(&station.name, route.to.clone(), route.probability)?;
            }
        }
        for arrival in &self.first_arrivals {
            builder.add_first_arrival(arrival.station.clone(), arrival.time);
        }
        builder
            .seeds(self.seeds.iter().copied())
            .random_budget(self.random_budget);

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qnet_core::routing::{Destination, NodeId};
    use qnet_core::ModelError;

    const TANDEM: &str = r#"
stations:
  - name: Q1
    servers: 2
    capacity: 3
    arrival: { min: 1.0, max: 4.0 }
    service: { min: 3.0, max: 4.0 }
    routes:
      - { to: Q2, probability: 0.8 }
      - { to: exit, probability: 0.2 }
  - name: Q2
    servers: 1
    service: { min: 2.0, max: 3.0 }
    routes:
      - { to: S, probability: 1.0 }
seeds: [1, 2, 3]
random_budget: 100000
first_arrivals:
  - { station: Q1, time: 1.0 }
"#;

    #[test]
    fn test_yaml_to_definition() {
        let config = NetworkConfig::from_yaml_str(TANDEM).unwrap();
        let def = config.to_definition().unwrap();

        assert_eq!(def.stations().len(), 2);
        assert_eq!(def.stations()[0].capacity, Capacity::Finite(3));
        assert_eq!(def.stations()[1].capacity, Capacity::Unbounded);
        assert_eq!(def.stations()[1].arrival, None);
        assert_eq!(
            def.stations()[0].routing.routes()[0].destination,
            Destination::Node(NodeId(1))
        );
        assert_eq!(def.seeds(), &[1, 2, 3]);
        assert_eq!(def.random_budget(), 100_000);
    }

    #[test]
    fn test_negative_seeds_accepted() {
        let yaml = TANDEM.replace("seeds: [1, 2, 3]", "seeds: [-5, 3]");
        let def = NetworkConfig::from_yaml_str(&yaml)
            .unwrap()
            .to_definition()
            .unwrap();
        assert_eq!(def.seeds(), &[-5, 3]);
    }

    #[test]
    fn test_zero_servers_fails_field_validation() {
        let yaml = TANDEM.replacen("servers: 2", "servers: 0", 1);
        assert!(matches!(
            NetworkConfig::from_yaml_str(&yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_first_arrivals_fails() {
        let yaml = TANDEM.replace("  - { station: Q1, time: 1.0 }\n", "");
        let yaml = yaml.replace("first_arrivals:\n", "first_arrivals: []\n");
        assert!(matches!(
            NetworkConfig::from_yaml_str(&yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_routing_sum_surfaces_model_error() {
        let yaml = TANDEM.replace("probability: 0.8", "probability: 0.3");
        let config = NetworkConfig::from_yaml_str(&yaml).unwrap();
        assert!(matches!(
            config.to_definition(),
            Err(ConfigError::Model(ModelError::RoutingSum { .. }))
        ));
    }

    #[test]
    fn test_unknown_route_target() {
        let yaml = TANDEM.replace("to: Q2", "to: Q7");
        let config = NetworkConfig::from_yaml_str(&yaml).unwrap();
        assert!(matches!(
            config.to_definition(),
            Err(ConfigError::Model(ModelError::UnknownStation(name))) if name == "Q7"
        ));
    }

    #[test]
    fn test_malformed_yaml_is_parsing_error() {
        assert!(matches!(
            NetworkConfig::from_yaml_str("stations: [ {"),
            Err(ConfigError::Parsing(_))
        ));
    }
}
