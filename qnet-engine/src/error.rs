use qnet_config::ConfigError;
use qnet_core::ModelError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Simulation processing error: {0}")]
    Processing(String),
}

impl From<JoinError> for SimulationError {
    fn from(err: JoinError) -> Self {
        SimulationError::Processing(err.to_string())
    }
}
