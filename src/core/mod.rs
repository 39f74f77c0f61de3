pub mod builder;
pub mod components;
pub mod connections;
pub mod errors;
pub mod execution;
pub mod memory;
pub mod types;
pub mod values;

#[cfg(test)]
mod tests;
