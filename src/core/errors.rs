use crate::core::memory::errors::ImageError;
use thiserror::Error;

/// Fatal problems with the declared structure, raised while building or
/// elaborating a design and while constructing the kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("width mismatch: {left} is {left_width} bits, {right} is {right_width} bits")]
    WidthMismatch {
        left: String,
        left_width: u32,
        right: String,
        right_width: u32,
    },
    #[error("invalid width {width}: must be between 1 and 64 bits")]
    InvalidWidth { width: u32 },
    #[error("constant {value} does not fit in {width} bits")]
    ConstantOverflow { value: u64, width: u32 },
    #[error("slice [{offset}+:{width}] is out of range for {signal} ({signal_width} bits)")]
    SliceOutOfRange {
        signal: String,
        offset: u32,
        width: u32,
        signal_width: u32,
    },
    #[error("module '{module}' has already been elaborated")]
    AlreadyElaborated { module: String },
    #[error("design has not been elaborated with this model as its top module")]
    NotElaborated,
    #[error("signal {signal} is already a member of '{owner}'")]
    SignalAlreadyOwned { signal: String, owner: String },
    #[error("combinational function '{function}' has no sensitivity set")]
    MissingSensitivity { function: String },
    #[error("combinational function '{function}' is sensitive to unconnected signal {signal}")]
    UnconnectedSensitivity { function: String, signal: String },
    #[error("unknown signal handle #{index}")]
    UnknownSignal { index: usize },
    #[error("unknown module handle #{index}")]
    UnknownModule { index: usize },
}

/// Every failure the kernel can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),
    #[error("write to unconnected signal {signal}")]
    DanglingWrite { signal: String },
    #[error("read from unconnected signal {signal}")]
    DanglingRead { signal: String },
    #[error("cannot write constant {signal}")]
    ConstantWrite { signal: String },
    #[error("settle did not converge after {iterations} invocations (last scheduled: '{function}')")]
    Nonconvergence { iterations: usize, function: String },
    #[error("cannot preload {signal} after simulation has started (cycle {cycle})")]
    PreloadAfterStart { signal: String, cycle: u64 },
    #[error("memory image error: {0}")]
    Image(#[from] ImageError),
    #[error("function '{function}' failed: {message}")]
    Model { function: String, message: String },
}

impl SimError {
    /// Build an error from inside a user update function
    pub fn model(function: &str, message: impl Into<String>) -> Self {
        SimError::Model {
            function: function.to_string(),
            message: message.into(),
        }
    }

    /// Check if this error is a structural error
    pub fn is_structural(&self) -> bool {
        matches!(self, SimError::Structural(_))
    }
}

/// Result alias used throughout the crate
pub type SimResult<T> = Result<T, SimError>;
