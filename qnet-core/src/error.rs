use thiserror::Error;

/// Everything that can be wrong with a network definition or with a pair of
/// reports that are being combined.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Station \"{0}\" is defined more than once")]
    DuplicateStation(String),

    #[error("Station \"{0}\" does not exist or wasn't previously defined")]
    UnknownStation(String),

    #[error("Station \"{station}\" needs at least one server, got {servers}")]
    NoServers { station: String, servers: u32 },

    #[error("Station \"{station}\" has capacity {capacity}, below its {servers} servers")]
    CapacityBelowServers {
        station: String,
        capacity: usize,
        servers: u32,
    },

    #[error("Station \"{station}\" has an invalid {kind} range [{min}, {max}]")]
    InvalidRange {
        station: String,
        kind: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Station \"{0}\" receives external arrivals but has no arrival range")]
    MissingArrivalRange(String),

    #[error("Station \"{0}\" has no routing destinations")]
    NoRoutes(String),

    #[error("Station \"{station}\" has an invalid routing probability {probability}")]
    InvalidProbability { station: String, probability: f64 },

    #[error("The routing probabilities of station \"{station}\" sum to {sum}, expected 1")]
    RoutingSum { station: String, sum: f64 },

    #[error("First arrival at station \"{station}\" has invalid time {time}")]
    InvalidArrivalTime { station: String, time: f64 },

    #[error("No first arrivals were defined for any station in the network")]
    NoFirstArrivals,

    #[error("No seeds were defined")]
    NoSeeds,

    #[error("The random-number budget must be positive")]
    ZeroBudget,

    #[error("Cannot combine reports: {0}")]
    ReportMismatch(String),

    #[error("Cannot average over zero runs")]
    ZeroRuns,
}
