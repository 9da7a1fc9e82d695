use crate::solver::SolverState;
use thiserror::Error;

/// Errors raised by the solver. None of them are transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("`{operation}` called before its prerequisites (solver is {state:?})")]
    UninitializedField {
        operation: &'static str,
        state: SolverState,
    },

    #[error("`{operation}` called after the field was already computed")]
    AlreadyComputed { operation: &'static str },

    #[error("diffusion number {diffusion_number} exceeds the explicit 5-point bound of 0.25")]
    Unstable { diffusion_number: f64 },

    #[error("time layer {index} out of range (field has {layers} layers)")]
    LayerOutOfRange { index: usize, layers: usize },
}

pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SolverError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
