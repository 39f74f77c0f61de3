pub mod net;
pub mod store;

// Re-export commonly used types
pub use net::{extract, insert, mask, Net, MAX_WIDTH};
pub use store::{Piece, ValueStore};
