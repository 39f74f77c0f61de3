use crate::core::components::design::Design;
use crate::core::execution::registry::Registrar;
use crate::core::types::{ModuleId, SignalId};

/// Structural record of one module instance, filled in by elaboration
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub(crate) type_name: String,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ModuleId>,
    pub(crate) ports: Vec<SignalId>,
    pub(crate) wires: Vec<SignalId>,
    pub(crate) submodules: Vec<ModuleId>,
    pub(crate) elaborated: bool,
}

impl ModuleEntry {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            name: None,
            parent: None,
            ports: Vec::new(),
            wires: Vec::new(),
            submodules: Vec::new(),
            elaborated: false,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub fn ports(&self) -> &[SignalId] {
        &self.ports
    }

    pub fn wires(&self) -> &[SignalId] {
        &self.wires
    }

    pub fn submodules(&self) -> &[ModuleId] {
        &self.submodules
    }

    pub fn is_elaborated(&self) -> bool {
        self.elaborated
    }
}

/// One declared member of a model
pub enum Member<'a> {
    /// A port or wire (constants are ignored by elaboration)
    Signal(SignalId),
    /// A child model
    Module(&'a dyn Model),
    /// A sequence; elements are named `<member>_<index>`
    List(Vec<Member<'a>>),
}

impl<'a> Member<'a> {
    /// Sequence of signals
    pub fn signals<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a SignalId>,
    {
        Member::List(items.into_iter().map(|id| Member::Signal(*id)).collect())
    }

    /// Sequence of child models
    pub fn modules<M, I>(items: I) -> Self
    where
        M: Model + 'a,
        I: IntoIterator<Item = &'a M>,
    {
        Member::List(
            items
                .into_iter()
                .map(|m| Member::Module(m as &dyn Model))
                .collect(),
        )
    }
}

/// Capability surface every simulated module exposes
///
/// Models are plain structs holding handles created through a [`Design`].
/// Structure is enumerated explicitly by [`Model::members`]; behavior is
/// declared by [`Model::register`]. Anything implementing this trait, an
/// externally compiled model wrapper included, is driven identically.
pub trait Model {
    /// Handle returned by [`Design::declare_module`] when this model was built
    fn module_id(&self) -> ModuleId;

    /// Named ports, wires, submodules and sequences of them, in declaration order
    fn members(&self) -> Vec<(String, Member<'_>)>;

    /// Register combinational and edge-triggered update functions
    fn register(&self, _functions: &mut Registrar<'_>) {}

    /// Human-readable snapshot for the per-cycle line trace
    fn line_trace(&self, _design: &Design) -> String {
        String::new()
    }
}
