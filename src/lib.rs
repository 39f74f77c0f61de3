mod macros;
pub mod core;

// Re-export commonly used types
pub use crate::core::components::{Design, Member, Model};
pub use crate::core::errors::{SimError, SimResult, StructuralError};
pub use crate::core::execution::{Context, EventOrder, Registrar, SimulationConfig, Simulator};
pub use crate::core::types::{Endpoint, FnId, ModuleId, NetId, SignalId, SignalKind, Slice};
