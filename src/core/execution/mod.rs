pub mod config;
pub mod cycle_engine;
pub mod event_queue;
pub mod registry;
pub mod sensitivity;
pub mod simulation_engine;
pub mod trace;

// Re-export commonly used types
pub use config::{EventOrder, SimulationConfig};
pub use cycle_engine::Context;
pub use event_queue::EventQueue;
pub use registry::{FunctionTable, Registrar, Role, UpdateFn};
pub use sensitivity::SensitivityRegistry;
pub use simulation_engine::{Simulator, RESET_CYCLES};
pub use trace::{TraceEvent, TraceLog, TraceRecorder, TraceSink};
