//! Error types for the stiffness solver

use thiserror::Error;

use crate::elements::NodeId;

/// Main error type for beam, frame and column analysis
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Node {0} not found in model")]
    NodeNotFound(NodeId),

    #[error("Duplicate {0}")]
    DuplicateId(String),

    #[error("Structure is unstable or a mechanism: {0}")]
    Unstable(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FEAError {
    /// True for failures caused by the caller's model rather than the solver
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidGeometry(_)
                | Self::NodeNotFound(_)
                | Self::DuplicateId(_)
                | Self::SerializationError(_)
        )
    }

    /// True when the reduced stiffness matrix could not be solved
    pub fn is_unstable(&self) -> bool {
        matches!(self, Self::Unstable(_))
    }
}

/// Result type for solver operations
pub type FEAResult<T> = Result<T, FEAError>;
