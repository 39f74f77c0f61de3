pub mod elaborator;

// Re-export commonly used types
pub use elaborator::{ElaborationSummary, Elaborator};
