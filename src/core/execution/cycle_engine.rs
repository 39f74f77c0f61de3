use crate::core::components::design::Design;
use crate::core::errors::{SimError, SimResult};
use crate::core::execution::event_queue::EventQueue;
use crate::core::execution::sensitivity::SensitivityRegistry;
use crate::core::execution::trace::{TraceEvent, TraceSink};
use crate::core::types::{Endpoint, NetId, SignalKind};
use crate::core::values::mask;
use log::{log_enabled, trace, Level};
use std::collections::HashMap;

/// Register commits staged by edge-triggered functions during one edge
///
/// Each endpoint holds one slot, at the position of its first staging;
/// staging it again only replaces the value.
#[derive(Debug, Default)]
pub(crate) struct StagedCommits {
    order: Vec<Endpoint>,
    values: HashMap<Endpoint, u64>,
}

impl StagedCommits {
    fn stage(&mut self, endpoint: Endpoint, value: u64) {
        if self.values.insert(endpoint, value).is_none() {
            self.order.push(endpoint);
        }
    }

    /// Most recently staged slot first
    fn pop(&mut self) -> Option<(Endpoint, u64)> {
        let endpoint = self.order.pop()?;
        let value = self.values.remove(&endpoint)?;
        Some((endpoint, value))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.values.clear();
    }
}

/// Everything the write path touches: values, sensitivity, the event
/// queue, staged commits and trace sinks
///
/// The simulator owns exactly one of these and lends it to update
/// functions through [`Context`].
pub(crate) struct Runtime {
    pub(crate) design: Design,
    pub(crate) sensitivity: SensitivityRegistry,
    pub(crate) queue: EventQueue,
    pub(crate) staged: StagedCommits,
    sinks: Vec<Box<dyn TraceSink>>,
    /// Index of the cycle in progress
    pub(crate) cycle: u64,
}

impl Runtime {
    pub(crate) fn new(design: Design, sensitivity: SensitivityRegistry, queue: EventQueue) -> Self {
        Self {
            design,
            sensitivity,
            queue,
            staged: StagedCommits::default(),
            sinks: Vec::new(),
            cycle: 0,
        }
    }

    /// Write through an endpoint and schedule every dependent function
    pub(crate) fn write(&mut self, endpoint: Endpoint, value: u64) -> SimResult<()> {
        let written = self.design.write_raw(endpoint, value)?;
        for (net, net_value) in written {
            if log_enabled!(Level::Trace) {
                trace!(
                    "write {} <= {:#x} ({} = {:#x})",
                    self.design.describe(endpoint),
                    value,
                    net,
                    net_value
                );
            }
            if !self.sinks.is_empty() {
                let event = TraceEvent {
                    cycle: self.cycle,
                    net,
                    value: net_value,
                };
                for sink in &mut self.sinks {
                    sink.on_write(&event);
                }
            }
            self.schedule_on_write(net);
        }
        Ok(())
    }

    pub(crate) fn schedule_on_write(&mut self, net: NetId) {
        for function in self.sensitivity.dependents(net) {
            self.queue.schedule(function);
        }
    }

    /// Stage a register commit, checking now that the target is writable
    pub(crate) fn stage(&mut self, endpoint: Endpoint, value: u64) -> SimResult<()> {
        let signal = self.design.signal(endpoint.signal())?;
        if signal.kind() == SignalKind::Constant {
            return Err(SimError::ConstantWrite {
                signal: self.design.describe(endpoint),
            });
        }
        if !signal.is_connected() {
            return Err(SimError::DanglingWrite {
                signal: self.design.describe(endpoint),
            });
        }
        self.staged.stage(endpoint, value);
        Ok(())
    }

    /// Apply staged commits, most recently staged first
    ///
    /// A failed write drops the commits not yet applied.
    pub(crate) fn commit(&mut self) -> SimResult<usize> {
        let mut committed = 0;
        while let Some((endpoint, value)) = self.staged.pop() {
            if let Err(err) = self.write(endpoint, value) {
                self.staged.clear();
                return Err(err);
            }
            committed += 1;
        }
        Ok(committed)
    }

    pub(crate) fn attach_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sinks.push(sink);
    }

    pub(crate) fn notify_cycle(&mut self, cycle: u64) {
        for sink in &mut self.sinks {
            sink.on_cycle(cycle);
        }
    }
}

/// View of the simulation handed to every update function
///
/// All value access goes through named operations; writes made here
/// schedule dependent combinational functions immediately, so they may be
/// issued from inside a settle pass.
pub struct Context<'r> {
    runtime: &'r mut Runtime,
}

impl<'r> Context<'r> {
    pub(crate) fn new(runtime: &'r mut Runtime) -> Self {
        Self { runtime }
    }

    /// Current value of an endpoint
    pub fn read(&self, endpoint: impl Into<Endpoint>) -> SimResult<u64> {
        self.runtime.design.read(endpoint)
    }

    /// Drive an endpoint; the value is truncated to its width
    pub fn write(&mut self, endpoint: impl Into<Endpoint>, value: u64) -> SimResult<()> {
        self.runtime.write(endpoint.into(), value)
    }

    /// Copy the value of `source` onto `target`
    pub fn assign(
        &mut self,
        target: impl Into<Endpoint>,
        source: impl Into<Endpoint>,
    ) -> SimResult<()> {
        let value = self.read(source)?;
        self.write(target, value)
    }

    /// Stage the next value of a register, applied after every edge
    /// function of this cycle has run
    pub fn set_next(&mut self, endpoint: impl Into<Endpoint>, value: u64) -> SimResult<()> {
        self.runtime.stage(endpoint.into(), value)
    }

    pub fn bitwise_and(&self, a: impl Into<Endpoint>, b: impl Into<Endpoint>) -> SimResult<u64> {
        Ok(self.read(a)? & self.read(b)?)
    }

    pub fn bitwise_or(&self, a: impl Into<Endpoint>, b: impl Into<Endpoint>) -> SimResult<u64> {
        Ok(self.read(a)? | self.read(b)?)
    }

    pub fn bitwise_xor(&self, a: impl Into<Endpoint>, b: impl Into<Endpoint>) -> SimResult<u64> {
        Ok(self.read(a)? ^ self.read(b)?)
    }

    /// Inverted value, masked to the endpoint width
    pub fn bitwise_not(&self, a: impl Into<Endpoint>) -> SimResult<u64> {
        let a = a.into();
        let width = self.width(a)?;
        Ok(!self.read(a)? & mask(width))
    }

    pub fn width(&self, endpoint: impl Into<Endpoint>) -> SimResult<u32> {
        self.runtime.design.width_of(endpoint)
    }

    /// Index of the cycle in progress
    pub fn cycle(&self) -> u64 {
        self.runtime.cycle
    }

    /// Read-only access to the whole design
    pub fn design(&self) -> &Design {
        &self.runtime.design
    }
}
