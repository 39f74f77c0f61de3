use crate::core::types::NetId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// A single net write observed by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Index of the cycle in progress when the write happened
    pub cycle: u64,
    /// Canonical net that changed
    pub net: NetId,
    /// Full value of the net after the write
    pub value: u64,
}

/// Observer for simulation activity (waveform writers, monitors)
pub trait TraceSink {
    /// Called for every net write
    fn on_write(&mut self, event: &TraceEvent);

    /// Called when a cycle completes; `cycle` is the new cycle count
    fn on_cycle(&mut self, _cycle: u64) {}
}

/// Everything a [`TraceRecorder`] has seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    pub writes: Vec<TraceEvent>,
    pub cycles: Vec<u64>,
}

/// In-memory sink; clone the handle before attaching to inspect it later
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    log: Rc<RefCell<TraceLog>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn log(&self) -> TraceLog {
        self.log.borrow().clone()
    }

    /// Writes recorded for one net, in order
    pub fn writes_to(&self, net: NetId) -> Vec<TraceEvent> {
        self.log
            .borrow()
            .writes
            .iter()
            .filter(|event| event.net == net)
            .copied()
            .collect()
    }

    pub fn clear(&self) {
        *self.log.borrow_mut() = TraceLog::default();
    }
}

impl TraceSink for TraceRecorder {
    fn on_write(&mut self, event: &TraceEvent) {
        self.log.borrow_mut().writes.push(*event);
    }

    fn on_cycle(&mut self, cycle: u64) {
        self.log.borrow_mut().cycles.push(cycle);
    }
}
