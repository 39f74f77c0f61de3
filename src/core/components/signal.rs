use crate::core::types::{Endpoint, ModuleId, NetId, SignalKind};

/// Where a signal's bits live: a net and the bit offset inside it
///
/// A whole port sits at offset 0 of its own net. A port connected to a slice
/// of another port is a view into that port's net.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub net: NetId,
    pub offset: u32,
}

/// Arena entry for a port, wire or constant
#[derive(Debug, Clone)]
pub struct SignalEntry {
    pub(crate) kind: SignalKind,
    pub(crate) width: u32,
    /// Assigned during elaboration (constants are named at creation)
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ModuleId>,
    /// `None` until first connected
    pub(crate) binding: Option<Binding>,
    /// Peer endpoints this signal has been connected to
    pub(crate) connections: Vec<Endpoint>,
}

impl SignalEntry {
    pub(crate) fn new(kind: SignalKind, width: u32) -> Self {
        Self {
            kind,
            width,
            name: None,
            parent: None,
            binding: None,
            connections: Vec::new(),
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub fn binding(&self) -> Option<Binding> {
        self.binding
    }

    pub fn is_connected(&self) -> bool {
        self.binding.is_some()
    }

    pub fn connections(&self) -> &[Endpoint] {
        &self.connections
    }
}
