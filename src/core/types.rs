use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a storage cell in the value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetId(pub(crate) usize);

impl NetId {
    /// Get the raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle to a port, wire or constant declared in a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub(crate) usize);

impl SignalId {
    /// Get the raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a module instance declared in a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a registered update function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FnId(pub(crate) usize);

impl FnId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a signal is, as declared at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Input port
    Input,
    /// Output port
    Output,
    /// Named net holder with no direction
    Wire,
    /// Immutable constant source
    Constant,
}

impl SignalKind {
    /// Check if this signal is a module port
    pub fn is_port(&self) -> bool {
        matches!(self, SignalKind::Input | SignalKind::Output)
    }

    /// Get a human-readable description of this signal kind
    pub fn description(&self) -> &'static str {
        match self {
            SignalKind::Input => "input port",
            SignalKind::Output => "output port",
            SignalKind::Wire => "wire",
            SignalKind::Constant => "constant",
        }
    }
}

/// Bit-range view of a signal
///
/// A slice never owns a net. Reads and writes go through the parent
/// signal's net at `offset`, touching exactly `width` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    pub(crate) signal: SignalId,
    pub(crate) offset: u32,
    pub(crate) width: u32,
}

impl Slice {
    pub fn signal(&self) -> SignalId {
        self.signal
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Anything that can be read, written or connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Signal(SignalId),
    Slice(Slice),
}

impl Endpoint {
    /// The signal this endpoint belongs to
    pub fn signal(&self) -> SignalId {
        match self {
            Endpoint::Signal(id) => *id,
            Endpoint::Slice(slice) => slice.signal,
        }
    }
}

impl From<SignalId> for Endpoint {
    fn from(id: SignalId) -> Self {
        Endpoint::Signal(id)
    }
}

impl From<Slice> for Endpoint {
    fn from(slice: Slice) -> Self {
        Endpoint::Slice(slice)
    }
}

/// Right-hand side of a connection: another endpoint or a raw constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectTarget {
    Endpoint(Endpoint),
    Constant(u64),
}

impl From<Endpoint> for ConnectTarget {
    fn from(endpoint: Endpoint) -> Self {
        ConnectTarget::Endpoint(endpoint)
    }
}

impl From<SignalId> for ConnectTarget {
    fn from(id: SignalId) -> Self {
        ConnectTarget::Endpoint(Endpoint::Signal(id))
    }
}

impl From<Slice> for ConnectTarget {
    fn from(slice: Slice) -> Self {
        ConnectTarget::Endpoint(Endpoint::Slice(slice))
    }
}

impl From<u64> for ConnectTarget {
    fn from(value: u64) -> Self {
        ConnectTarget::Constant(value)
    }
}
