use thiserror::Error;

/// Errors that abort a simulation run
#[derive(Debug, Error)]
pub enum SimError {
    /// Missing or inconsistent profile data, bad parameters, unusable reference
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A bounded retry loop ran out of attempts
    #[error("Sampling exhausted: {what} did not succeed after {attempts} attempts")]
    SamplingExhaustion { what: String, attempts: usize },

    /// Profile text that does not split into the expected numeric fields
    #[error("Parse error in {path} line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    /// Underlying file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        SimError::Configuration(message.into())
    }

    pub fn exhausted(what: impl Into<String>, attempts: usize) -> Self {
        SimError::SamplingExhaustion {
            what: what.into(),
            attempts,
        }
    }
}

impl From<statrs::StatsError> for SimError {
    fn from(e: statrs::StatsError) -> Self {
        SimError::Configuration(format!("invalid distribution parameter: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
