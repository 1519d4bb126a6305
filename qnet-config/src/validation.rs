//! Custom validation functions shared by the YAML and text loaders.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref STATION_NAME: Regex = Regex::new("^[A-Za-z0-9_]+$").unwrap();
}

/// Station names are non-empty ASCII identifiers.
pub fn validate_station_name(name: &str) -> Result<(), ValidationError> {
    if STATION_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_station_name"))
    }
}

/// Routing destinations are station names or an exit alias.
pub fn validate_destination(name: &str) -> Result<(), ValidationError> {
    if qnet_core::network::is_exit_name(name) {
        return Ok(());
    }
    validate_station_name(name).map_err(|_| ValidationError::new("invalid_destination"))
}
