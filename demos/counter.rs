use cyclesim::core::execution::TraceRecorder;
use cyclesim::{
    members, Design, Member, Model, ModuleId, Registrar, SignalId, SimResult, SimulationConfig,
    Simulator,
};

/// 8-bit adder: sum = a + b
struct Adder {
    id: ModuleId,
    a: SignalId,
    b: SignalId,
    sum: SignalId,
}

impl Adder {
    fn new(design: &mut Design) -> SimResult<Self> {
        Ok(Self {
            id: design.declare_module("Adder"),
            a: design.in_port(8)?,
            b: design.in_port(8)?,
            sum: design.out_port(8)?,
        })
    }
}

impl Model for Adder {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn members(&self) -> Vec<(String, Member<'_>)> {
        members![self; signals: [a, b, sum]]
    }

    fn register(&self, functions: &mut Registrar<'_>) {
        let (a, b, sum) = (self.a, self.b, self.sum);
        functions.combinational("comb", [a, b], move |ctx| {
            let value = ctx.read(a)? + ctx.read(b)?;
            ctx.write(sum, value)
        });
    }
}

/// Resettable counter; the register feeds an adder whose other input is tied to 1
struct Counter {
    id: ModuleId,
    clk: SignalId,
    reset: SignalId,
    count: SignalId,
    next: SignalId,
    adder: Adder,
}

impl Counter {
    fn new(design: &mut Design) -> SimResult<Self> {
        let counter = Self {
            id: design.declare_module("Counter"),
            clk: design.in_port(1)?,
            reset: design.in_port(1)?,
            count: design.out_port(8)?,
            next: design.wire(8)?,
            adder: Adder::new(design)?,
        };
        design.connect(counter.adder.a, counter.count)?;
        design.connect(counter.adder.b, 1u64)?;
        design.connect(counter.adder.sum, counter.next)?;
        Ok(counter)
    }
}

impl Model for Counter {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn members(&self) -> Vec<(String, Member<'_>)> {
        members![self; signals: [clk, reset, count, next], submodules: [adder]]
    }

    fn register(&self, functions: &mut Registrar<'_>) {
        let (reset, count, next) = (self.reset, self.count, self.next);
        functions.posedge("seq", move |ctx| {
            if ctx.read(reset)? == 1 {
                ctx.set_next(count, 0)
            } else {
                let value = ctx.read(next)?;
                ctx.set_next(count, value)
            }
        });
    }

    fn line_trace(&self, design: &Design) -> String {
        match (design.read(self.reset), design.read(self.count)) {
            (Ok(reset), Ok(count)) => format!("reset={} count={:3}", reset, count),
            _ => "?".to_string(),
        }
    }
}

fn main() -> SimResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut design = Design::new();
    let counter = Counter::new(&mut design)?;
    design.elaborate(&counter, "counter")?;

    let mut sim = Simulator::new(design, counter, SimulationConfig::default())?;
    let recorder = TraceRecorder::new();
    sim.attach_trace_sink(Box::new(recorder.clone()));
    sim.enable_line_trace(true);

    sim.reset()?;
    sim.print_line_trace();
    for _ in 0..10 {
        sim.cycle()?;
        sim.print_line_trace();
    }

    let count = sim.model().count;
    println!(
        "finished after {} cycles: count = {}",
        sim.num_cycles(),
        sim.read(count)?
    );
    if let Some(net) = sim.net_of(count) {
        let changes = recorder.writes_to(net).len();
        println!("{} writes recorded on the count net", changes);
    }
    Ok(())
}
