//! Configuration for cyclesim simulation execution
//!
//! This module provides the knobs that control how the kernel drains its
//! event queue and which top-level ports it drives as clock and reset.

use serde::{Deserialize, Serialize};

/// Default bound on function invocations within one settle pass
pub const DEFAULT_MAX_SETTLE_ITERATIONS: usize = 100_000;

/// Order in which pending combinational functions are drained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrder {
    /// Most recently triggered function runs first
    Lifo,
    /// Functions run in the order they were triggered
    Fifo,
}

impl Default for EventOrder {
    fn default() -> Self {
        EventOrder::Lifo
    }
}

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Drain order of the event queue
    pub event_order: EventOrder,
    /// Invocations allowed in one settle before reporting nonconvergence
    pub max_settle_iterations: usize,
    /// Name of the top-level port driven as the clock
    pub clock_port: String,
    /// Name of the top-level port driven by `reset()`
    pub reset_port: String,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    ///
    /// Defaults: LIFO draining, 100 000 invocations per settle, ports named
    /// `clk` and `reset`.
    pub fn new() -> Self {
        Self {
            event_order: EventOrder::default(),
            max_settle_iterations: DEFAULT_MAX_SETTLE_ITERATIONS,
            clock_port: "clk".to_string(),
            reset_port: "reset".to_string(),
        }
    }

    /// Set the drain order of the event queue
    pub fn with_event_order(mut self, order: EventOrder) -> Self {
        self.event_order = order;
        self
    }

    /// Set the settle bound
    ///
    /// # Arguments
    /// * `limit` - Invocations allowed before `settle()` gives up
    pub fn with_max_settle_iterations(mut self, limit: usize) -> Self {
        self.max_settle_iterations = limit;
        self
    }

    pub fn with_clock_port(mut self, name: &str) -> Self {
        self.clock_port = name.to_string();
        self
    }

    pub fn with_reset_port(mut self, name: &str) -> Self {
        self.reset_port = name.to_string();
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
