use thiserror::Error;

use crate::domain::fog_system_model::resource::resource_container::ResourceError;
use crate::domain::fog_system_model::utils::id::{ClientId, NodeId, SessionId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse simulation config JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to read or write CSV data: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid simulation configuration: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Resource accounting breached: {0}")]
    Resource(#[from] ResourceError),

    #[error("Unknown fog node {0:?}")]
    UnknownNode(NodeId),

    #[error("Unknown client {0:?}")]
    UnknownClient(ClientId),

    #[error("Unknown session {0:?}")]
    UnknownSession(SessionId),

    #[error("Fog network invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Orchestration scheme 'learned' requires a decision strategy to be supplied")]
    MissingDecisionStrategy,
}

/// Failures while turning configuration values into domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Unknown allocation policy: '{0}'")]
    UnknownAllocationPolicy(String),

    #[error("Unknown orchestration scheme: '{0}'")]
    UnknownOrchestrationScheme(String),

    #[error("Unknown metric: '{0}'")]
    UnknownMetric(String),

    #[error("Unsupported fog node bandwidth {0} MHz")]
    UnsupportedBandwidth(f64),

    #[error("Invalid range for '{field}': [{lo}, {hi}]")]
    InvalidRange { field: &'static str, lo: f64, hi: f64 },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
