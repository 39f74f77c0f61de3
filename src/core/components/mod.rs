pub mod design;
pub mod module;
pub mod signal;

// Re-export commonly used types
pub use design::{Design, Location};
pub use module::{Member, Model, ModuleEntry};
pub use signal::{Binding, SignalEntry};
