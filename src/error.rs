use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::facelet::Face;
use crate::validator::ValidationError;

/// Stable codes for the failures a solve can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssemblyErrorCode {
    InvalidCubeState,
    IncompleteCubeState,
    UnsolvableCube,
    CalculationTimeout,
    AlgorithmError,
    MaxMovesExceeded,
    AlreadySolved,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("The cube state is invalid and cannot be solved. Please check your configuration.")]
    InvalidCubeState { errors: Vec<ValidationError> },
    #[error("The cube state is incomplete. All 54 facelets must be configured.")]
    IncompleteCubeState { errors: Vec<ValidationError> },
    #[error("This cube configuration cannot be solved. It may be physically impossible.")]
    UnsolvableCube { errors: Vec<ValidationError> },
    #[error("Solution calculation timed out after {timeout_ms} ms.")]
    CalculationTimeout { timeout_ms: u64 },
    #[error("The solving algorithm encountered an unexpected error: {message}")]
    AlgorithmError {
        message: String,
        cause: Option<Box<Error>>,
    },
    #[error("Could not find a solution within the maximum move limit ({moves_found} moves found, {max_moves} allowed).")]
    MaxMovesExceeded { moves_found: usize, max_moves: usize },
    #[error("The cube is already in a solved state. No moves needed.")]
    AlreadySolved,

    #[error("invalid move notation `{0}`")]
    InvalidScramble(String),
    #[error("invalid facelet string: {0}")]
    InvalidFaceletString(String),
    #[error("facelet {face}{position} is a center and cannot be changed")]
    CenterFacelet { face: Face, position: usize },
    #[error("facelet position {0} is out of range")]
    InvalidFaceletPosition(usize),
    #[error("invalid cubie value")]
    InvalidCubieValue,
    #[error("search aborted")]
    SearchAborted,
    #[error("solver task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encode(#[from] bincode::error::EncodeError),
    #[error(transparent)]
    Decode(#[from] bincode::error::DecodeError),
}

impl Error {
    pub fn code(&self) -> AssemblyErrorCode {
        match self {
            Error::InvalidCubeState { .. } => AssemblyErrorCode::InvalidCubeState,
            Error::IncompleteCubeState { .. } => AssemblyErrorCode::IncompleteCubeState,
            Error::UnsolvableCube { .. } => AssemblyErrorCode::UnsolvableCube,
            Error::CalculationTimeout { .. } => AssemblyErrorCode::CalculationTimeout,
            Error::MaxMovesExceeded { .. } => AssemblyErrorCode::MaxMovesExceeded,
            Error::AlreadySolved => AssemblyErrorCode::AlreadySolved,
            _ => AssemblyErrorCode::AlgorithmError,
        }
    }

    /// Validation findings carried by the state-related kinds.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Error::InvalidCubeState { errors }
            | Error::IncompleteCubeState { errors }
            | Error::UnsolvableCube { errors } => errors,
            _ => &[],
        }
    }

    /// Wraps a failure raised inside a solving algorithm, keeping it as the cause.
    pub fn algorithm(cause: Error) -> Self {
        match cause {
            Error::AlgorithmError { .. } => cause,
            cause => Error::AlgorithmError {
                message: cause.to_string(),
                cause: Some(Box::new(cause)),
            },
        }
    }
}
