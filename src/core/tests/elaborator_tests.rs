use crate::core::builder::elaborator::Elaborator;
use crate::core::components::design::Design;
use crate::core::components::module::{Member, Model};
use crate::core::errors::{SimError, SimResult, StructuralError};
use crate::core::types::{ModuleId, SignalId};
use crate::members;

struct Leaf {
    id: ModuleId,
    a: SignalId,
    y: SignalId,
}

impl Leaf {
    fn new(design: &mut Design) -> SimResult<Self> {
        Ok(Self {
            id: design.declare_module("Leaf"),
            a: design.in_port(4)?,
            y: design.out_port(4)?,
        })
    }
}

impl Model for Leaf {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn members(&self) -> Vec<(String, Member<'_>)> {
        members![self; signals: [a, y]]
    }
}

struct Tree {
    id: ModuleId,
    clk: SignalId,
    tmp: SignalId,
    taps: Vec<SignalId>,
    left: Leaf,
    stages: Vec<Leaf>,
}

impl Tree {
    fn new(design: &mut Design) -> SimResult<Self> {
        Ok(Self {
            id: design.declare_module("Tree"),
            clk: design.in_port(1)?,
            tmp: design.wire(4)?,
            taps: vec![design.out_port(1)?, design.out_port(1)?],
            left: Leaf::new(design)?,
            stages: vec![Leaf::new(design)?, Leaf::new(design)?],
        })
    }
}

impl Model for Tree {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn members(&self) -> Vec<(String, Member<'_>)> {
        members![self;
            signals: [clk, tmp],
            submodules: [left],
            signal_lists: [taps],
            submodule_lists: [stages],
        ]
    }
}

#[test]
fn test_names_and_parents() {
    let mut design = Design::new();
    let tree = Tree::new(&mut design).unwrap();
    let top = design.elaborate(&tree, "top").unwrap();

    assert_eq!(design.top(), Some(top));
    assert_eq!(design.module_path(tree.left.id), "top.left");
    assert_eq!(design.module_path(tree.stages[1].id), "top.stages_1");
    assert_eq!(design.signal_path(tree.clk), "top.clk");
    assert_eq!(design.signal_path(tree.taps[0]), "top.taps_0");
    assert_eq!(design.signal_path(tree.stages[0].y), "top.stages_0.y");

    let entry = design.module(top).unwrap();
    assert_eq!(entry.ports(), &[tree.clk, tree.taps[0], tree.taps[1]]);
    assert_eq!(entry.wires(), &[tree.tmp]);
    assert_eq!(
        entry.submodules(),
        &[tree.left.id, tree.stages[0].id, tree.stages[1].id]
    );
    assert_eq!(design.signal(tree.left.a).unwrap().parent(), Some(tree.left.id));
    assert_eq!(design.find_port(tree.left.id, "y"), Some(tree.left.y));
}

#[test]
fn test_summary_counts() {
    let mut design = Design::new();
    let tree = Tree::new(&mut design).unwrap();
    let summary = Elaborator::new(&mut design).run(&tree, "top").unwrap();
    assert_eq!(summary.modules, 4);
    assert_eq!(summary.ports, 3 + 3 * 2);
    assert_eq!(summary.wires, 1);
    assert_eq!(summary.ignored, 0);
}

#[test]
fn test_second_elaboration_rejected() {
    let mut design = Design::new();
    let tree = Tree::new(&mut design).unwrap();
    design.elaborate(&tree, "top").unwrap();
    let err = design.elaborate(&tree, "again").unwrap_err();
    assert!(matches!(
        err,
        SimError::Structural(StructuralError::AlreadyElaborated { .. })
    ));
}

/// Lists the same child twice
struct Shared {
    id: ModuleId,
    child: Leaf,
}

impl Model for Shared {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn members(&self) -> Vec<(String, Member<'_>)> {
        vec![
            ("first".to_string(), Member::Module(&self.child)),
            ("second".to_string(), Member::Module(&self.child)),
        ]
    }
}

#[test]
fn test_submodule_elaborated_twice_rejected() {
    let mut design = Design::new();
    let shared = Shared {
        id: design.declare_module("Shared"),
        child: Leaf::new(&mut design).unwrap(),
    };
    let err = design.elaborate(&shared, "top").unwrap_err();
    match err {
        SimError::Structural(StructuralError::AlreadyElaborated { module }) => {
            assert_eq!(module, "top.first")
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_failed_elaboration_can_be_retried() {
    let mut design = Design::new();
    let shared = Shared {
        id: design.declare_module("Shared"),
        child: Leaf::new(&mut design).unwrap(),
    };
    assert!(design.elaborate(&shared, "top").is_err());

    assert_eq!(design.top(), None);
    let child = design.module(shared.child.id).unwrap();
    assert!(!child.is_elaborated());
    assert_eq!(child.name(), None);
    assert!(!design.module(shared.id).unwrap().is_elaborated());
    assert!(design.module(shared.id).unwrap().submodules().is_empty());
    assert_eq!(design.signal(shared.child.a).unwrap().parent(), None);

    // the child alone is still a valid top module
    let top = design.elaborate(&shared.child, "solo").unwrap();
    assert_eq!(top, shared.child.id);
    assert_eq!(design.signal_path(shared.child.y), "solo.y");
}

/// Claims one port under two names and lists a constant
struct Aliased {
    id: ModuleId,
    port: SignalId,
    extra: Vec<SignalId>,
}

impl Model for Aliased {
    fn module_id(&self) -> ModuleId {
        self.id
    }

    fn members(&self) -> Vec<(String, Member<'_>)> {
        let mut members = vec![("port".to_string(), Member::Signal(self.port))];
        members.push(("extra".to_string(), Member::signals(&self.extra)));
        members
    }
}

#[test]
fn test_signal_claimed_twice_rejected() {
    let mut design = Design::new();
    let port = design.in_port(2).unwrap();
    let aliased = Aliased {
        id: design.declare_module("Aliased"),
        port,
        extra: vec![port],
    };
    let err = design.elaborate(&aliased, "top").unwrap_err();
    match err {
        SimError::Structural(StructuralError::SignalAlreadyOwned { signal, owner }) => {
            assert_eq!(signal, "top.extra_0");
            assert_eq!(owner, "top");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_constant_member_ignored() {
    let mut design = Design::new();
    let port = design.in_port(2).unwrap();
    let constant = design.constant(2, 3).unwrap();
    let aliased = Aliased {
        id: design.declare_module("Aliased"),
        port,
        extra: vec![constant],
    };
    let summary = Elaborator::new(&mut design).run(&aliased, "top").unwrap();
    assert_eq!(summary.ignored, 1);
    assert_eq!(summary.ports, 1);
    assert_eq!(design.signal(constant).unwrap().parent(), None);
    assert_eq!(design.signal_path(constant), "2'd3");
}
