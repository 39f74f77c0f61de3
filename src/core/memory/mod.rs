pub mod errors;
pub mod image;

// Re-export commonly used types
pub use errors::ImageError;
pub use image::{Section, SparseMemoryImage};
