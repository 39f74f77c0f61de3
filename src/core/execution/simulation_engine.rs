use crate::core::components::design::Design;
use crate::core::components::module::{Member, Model};
use crate::core::errors::{SimError, SimResult, StructuralError};
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::cycle_engine::{Context, Runtime};
use crate::core::execution::event_queue::EventQueue;
use crate::core::execution::registry::{FunctionTable, Registrar, Role};
use crate::core::execution::sensitivity::SensitivityRegistry;
use crate::core::execution::trace::TraceSink;
use crate::core::types::{Endpoint, FnId, NetId, SignalId};
use log::{debug, info, trace};

/// Number of full cycles `reset()` holds the reset net high
pub const RESET_CYCLES: u32 = 2;

/// Cycle-based simulation kernel
///
/// Owns the elaborated design, the top model and every registered update
/// function. Each [`cycle`](Simulator::cycle) settles combinational logic
/// with the clock low, raises the clock, runs edge-triggered functions,
/// commits staged registers and settles again.
pub struct Simulator<M: Model> {
    model: M,
    functions: FunctionTable,
    runtime: Runtime,
    edge_functions: Vec<FnId>,
    clock: SignalId,
    reset: SignalId,
    config: SimulationConfig,
    num_cycles: u64,
    line_trace_enabled: bool,
    last_line_trace: Option<String>,
}

impl<M: Model> Simulator<M> {
    /// Build a kernel from an elaborated design and its top model
    ///
    /// Collects the registration table from the whole hierarchy, resolves
    /// every sensitivity set to canonical nets and primes the event queue
    /// with every combinational function.
    pub fn new(mut design: Design, model: M, config: SimulationConfig) -> SimResult<Self> {
        let top = model.module_id();
        if design.top() != Some(top) {
            return Err(StructuralError::NotElaborated.into());
        }

        let mut functions = FunctionTable::new();
        collect_functions(&design, &model, &mut functions);

        // The harness is the only peer of a still-unbound top-level port
        let top_ports = design.module(top)?.ports().to_vec();
        for port in top_ports {
            design.bind_fresh(port)?;
        }

        let clock = match design.find_port(top, &config.clock_port) {
            Some(port) => port,
            None => {
                debug!("top module has no '{}' port, using a private clock", config.clock_port);
                design.internal_wire(&config.clock_port)?
            }
        };
        let reset = match design.find_port(top, &config.reset_port) {
            Some(port) => port,
            None => {
                debug!("top module has no '{}' port, using a private reset", config.reset_port);
                design.internal_wire(&config.reset_port)?
            }
        };

        design.store.compress();

        let mut sensitivity = SensitivityRegistry::new();
        let mut edge_functions = Vec::new();
        let mut combinational = Vec::new();
        for (id, name, role) in functions.iter() {
            match role {
                Role::Edge => edge_functions.push(id),
                Role::Combinational { sensitivity: endpoints } => {
                    if endpoints.is_empty() {
                        return Err(StructuralError::MissingSensitivity {
                            function: name.to_string(),
                        }
                        .into());
                    }
                    for endpoint in endpoints {
                        let nets = design.nets_of(*endpoint).ok_or_else(|| {
                            SimError::from(StructuralError::UnconnectedSensitivity {
                                function: name.to_string(),
                                signal: design.describe(*endpoint),
                            })
                        })?;
                        for net in nets {
                            sensitivity.add(net, id);
                        }
                    }
                    combinational.push(id);
                }
            }
        }

        let mut queue = EventQueue::new(functions.len(), config.event_order);
        for id in &combinational {
            queue.schedule(*id);
        }

        info!(
            "simulator ready: {} combinational, {} edge-triggered functions over {} nets",
            combinational.len(),
            edge_functions.len(),
            design.net_count()
        );

        Ok(Self {
            model,
            functions,
            runtime: Runtime::new(design, sensitivity, queue),
            edge_functions,
            clock,
            reset,
            config,
            num_cycles: 0,
            line_trace_enabled: false,
            last_line_trace: None,
        })
    }

    /// Execute one full clock cycle
    pub fn cycle(&mut self) -> SimResult<()> {
        debug!("=== Simulation Cycle {} ===", self.num_cycles);

        // Low phase
        self.runtime.write(Endpoint::Signal(self.clock), 0)?;
        self.settle()?;

        // Edge phase
        self.runtime.write(Endpoint::Signal(self.clock), 1)?;
        for i in 0..self.edge_functions.len() {
            let id = self.edge_functions[i];
            if let Err(err) = self.invoke(id) {
                // a failed edge must not leak half of its commits into the next one
                self.runtime.staged.clear();
                return Err(err);
            }
        }
        let staged = self.runtime.staged.len();
        let committed = self.runtime.commit()?;
        trace!("committed {} of {} staged registers", committed, staged);
        self.settle()?;

        self.num_cycles += 1;
        self.runtime.cycle = self.num_cycles;
        self.runtime.notify_cycle(self.num_cycles);

        if self.line_trace_enabled {
            let line = self.model.line_trace(&self.runtime.design);
            debug!("{:>3}: {}", self.num_cycles, line);
            self.last_line_trace = Some(line);
        }
        Ok(())
    }

    /// Run `cycles` cycles back to back, returning the new cycle count
    pub fn run(&mut self, cycles: u64) -> SimResult<u64> {
        for _ in 0..cycles {
            self.cycle()?;
        }
        Ok(self.num_cycles)
    }

    /// Hold reset high for two full cycles, then release it
    pub fn reset(&mut self) -> SimResult<()> {
        self.runtime.write(Endpoint::Signal(self.reset), 1)?;
        for _ in 0..RESET_CYCLES {
            self.cycle()?;
        }
        self.runtime.write(Endpoint::Signal(self.reset), 0)
    }

    /// Drain the event queue to a fixed point
    ///
    /// Returns the number of functions invoked. Fails with
    /// [`SimError::Nonconvergence`] once the configured bound is exceeded.
    pub fn settle(&mut self) -> SimResult<usize> {
        let limit = self.config.max_settle_iterations;
        let mut invocations = 0;
        while let Some(id) = self.runtime.queue.pop() {
            if invocations >= limit {
                return Err(SimError::Nonconvergence {
                    iterations: invocations,
                    function: self.functions.name(id).to_string(),
                });
            }
            invocations += 1;
            self.invoke(id)?;
        }
        Ok(invocations)
    }

    fn invoke(&mut self, id: FnId) -> SimResult<()> {
        let Some(entry) = self.functions.entry_mut(id) else {
            return Ok(());
        };
        trace!("invoke {}", entry.name);
        let mut context = Context::new(&mut self.runtime);
        (entry.func)(&mut context)
    }

    /// Drive an endpoint from the harness; dependents are scheduled but
    /// not run until the next settle
    pub fn write(&mut self, endpoint: impl Into<Endpoint>, value: u64) -> SimResult<()> {
        self.runtime.write(endpoint.into(), value)
    }

    pub fn read(&self, endpoint: impl Into<Endpoint>) -> SimResult<u64> {
        self.runtime.design.read(endpoint)
    }

    /// Write an initial value before the first cycle (memory images, fixtures)
    pub fn preload(&mut self, endpoint: impl Into<Endpoint>, value: u64) -> SimResult<()> {
        let endpoint = endpoint.into();
        if self.num_cycles > 0 {
            return Err(SimError::PreloadAfterStart {
                signal: self.runtime.design.describe(endpoint),
                cycle: self.num_cycles,
            });
        }
        self.runtime.write(endpoint, value)
    }

    /// Completed cycles
    pub fn num_cycles(&self) -> u64 {
        self.num_cycles
    }

    pub fn attach_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.runtime.attach_sink(sink);
    }

    /// Poll the model's line trace once per cycle
    pub fn enable_line_trace(&mut self, enabled: bool) {
        self.line_trace_enabled = enabled;
        if !enabled {
            self.last_line_trace = None;
        }
    }

    /// Current line-trace snapshot of the model
    pub fn line_trace(&self) -> String {
        self.model.line_trace(&self.runtime.design)
    }

    /// Line polled at the end of the last cycle, if tracing is enabled
    pub fn last_line_trace(&self) -> Option<&str> {
        self.last_line_trace.as_deref()
    }

    pub fn print_line_trace(&self) {
        if self.line_trace_enabled {
            println!("{:>3}: {}", self.num_cycles, self.line_trace());
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn design(&self) -> &Design {
        &self.runtime.design
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Canonical net of an endpoint
    pub fn net_of(&self, endpoint: impl Into<Endpoint>) -> Option<NetId> {
        self.runtime.design.net_of(endpoint)
    }

    pub fn clock_net(&self) -> Option<NetId> {
        self.net_of(self.clock)
    }

    pub fn reset_net(&self) -> Option<NetId> {
        self.net_of(self.reset)
    }

    /// Functions waiting for the next settle
    pub fn pending_events(&self) -> usize {
        self.runtime.queue.len()
    }

    pub fn is_pending(&self, id: FnId) -> bool {
        self.runtime.queue.is_pending(id)
    }

    /// Schedule a function as if one of its inputs had been written
    pub fn schedule(&mut self, id: FnId) -> bool {
        self.runtime.queue.schedule(id)
    }
}

/// Walk the model tree, parents before children, collecting registrations
fn collect_functions(design: &Design, model: &dyn Model, table: &mut FunctionTable) {
    let scope = design.module_path(model.module_id());
    model.register(&mut Registrar::new(table, scope));
    for (_, member) in model.members() {
        collect_member(design, member, table);
    }
}

fn collect_member(design: &Design, member: Member<'_>, table: &mut FunctionTable) {
    match member {
        Member::Signal(_) => {}
        Member::Module(child) => collect_functions(design, child, table),
        Member::List(items) => {
            for item in items {
                collect_member(design, item, table);
            }
        }
    }
}
