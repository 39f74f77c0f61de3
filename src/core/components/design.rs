use crate::core::components::module::ModuleEntry;
use crate::core::components::signal::{Binding, SignalEntry};
use crate::core::connections::port_validator::PortValidator;
use crate::core::errors::{SimError, SimResult, StructuralError};
use crate::core::types::{Endpoint, ModuleId, NetId, SignalId, SignalKind, Slice};
use crate::core::values::{ValueStore, mask};

/// Resolved storage location of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Canonical net
    pub net: NetId,
    /// Bit offset inside the canonical net
    pub offset: u32,
    pub width: u32,
}

/// Owner of every net, signal and module of one simulated design
///
/// Models are built against a `Design`: they declare their module and
/// ports here, connect endpoints, and are then elaborated once. The design
/// is handed to the simulator afterwards and never changes shape again.
#[derive(Debug, Default)]
pub struct Design {
    pub(crate) store: ValueStore,
    pub(crate) signals: Vec<SignalEntry>,
    pub(crate) modules: Vec<ModuleEntry>,
    pub(crate) top: Option<ModuleId>,
}

impl Design {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a module slot; the model keeps the handle
    pub fn declare_module(&mut self, type_name: &str) -> ModuleId {
        let id = ModuleId(self.modules.len());
        self.modules.push(ModuleEntry::new(type_name));
        id
    }

    /// Declare an input port
    pub fn in_port(&mut self, width: u32) -> SimResult<SignalId> {
        self.add_signal(SignalKind::Input, width)
    }

    /// Declare an output port
    pub fn out_port(&mut self, width: u32) -> SimResult<SignalId> {
        self.add_signal(SignalKind::Output, width)
    }

    /// Declare a wire; wires own a net from the start
    pub fn wire(&mut self, width: u32) -> SimResult<SignalId> {
        let id = self.add_signal(SignalKind::Wire, width)?;
        let net = self.store.allocate(width, 0);
        self.signals[id.0].binding = Some(Binding { net, offset: 0 });
        Ok(id)
    }

    /// Materialize an immutable constant with its own net
    pub(crate) fn constant(&mut self, width: u32, value: u64) -> SimResult<SignalId> {
        PortValidator::validate_constant(value, width)?;
        let id = self.add_signal(SignalKind::Constant, width)?;
        let net = self.store.allocate(width, value);
        let entry = &mut self.signals[id.0];
        entry.name = Some(format!("{}'d{}", width, value));
        entry.binding = Some(Binding { net, offset: 0 });
        Ok(id)
    }

    fn add_signal(&mut self, kind: SignalKind, width: u32) -> SimResult<SignalId> {
        PortValidator::validate_width(width)?;
        let id = SignalId(self.signals.len());
        self.signals.push(SignalEntry::new(kind, width));
        Ok(id)
    }

    /// Bit-range view `[offset, offset + width)` of a signal
    pub fn slice(&self, signal: SignalId, offset: u32, width: u32) -> SimResult<Slice> {
        let entry = self.signal(signal)?;
        PortValidator::validate_width(width)?;
        if offset.checked_add(width).map_or(true, |end| end > entry.width) {
            return Err(StructuralError::SliceOutOfRange {
                signal: self.signal_path(signal),
                offset,
                width,
                signal_width: entry.width,
            }
            .into());
        }
        Ok(Slice {
            signal,
            offset,
            width,
        })
    }

    /// Single-bit view of a signal
    pub fn bit(&self, signal: SignalId, index: u32) -> SimResult<Slice> {
        self.slice(signal, index, 1)
    }

    pub fn signal(&self, id: SignalId) -> SimResult<&SignalEntry> {
        self.signals
            .get(id.0)
            .ok_or_else(|| StructuralError::UnknownSignal { index: id.0 }.into())
    }

    pub(crate) fn signal_mut(&mut self, id: SignalId) -> SimResult<&mut SignalEntry> {
        self.signals
            .get_mut(id.0)
            .ok_or_else(|| StructuralError::UnknownSignal { index: id.0 }.into())
    }

    pub fn module(&self, id: ModuleId) -> SimResult<&ModuleEntry> {
        self.modules
            .get(id.0)
            .ok_or_else(|| StructuralError::UnknownModule { index: id.0 }.into())
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> SimResult<&mut ModuleEntry> {
        self.modules
            .get_mut(id.0)
            .ok_or_else(|| StructuralError::UnknownModule { index: id.0 }.into())
    }

    /// Top module, once elaborated
    pub fn top(&self) -> Option<ModuleId> {
        self.top
    }

    pub fn is_elaborated(&self) -> bool {
        self.top.is_some()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of canonical nets currently in the store
    pub fn net_count(&self) -> usize {
        self.store.root_count()
    }

    /// Width of an endpoint in bits
    pub fn width_of(&self, endpoint: impl Into<Endpoint>) -> SimResult<u32> {
        match endpoint.into() {
            Endpoint::Signal(id) => Ok(self.signal(id)?.width),
            Endpoint::Slice(slice) => {
                self.signal(slice.signal)?;
                Ok(slice.width)
            }
        }
    }

    /// Hierarchical name of a module, e.g. `top.alu`
    pub fn module_path(&self, id: ModuleId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(module_id) = current {
            match self.modules.get(module_id.0) {
                Some(entry) => {
                    parts.push(
                        entry
                            .name
                            .clone()
                            .unwrap_or_else(|| format!("<{}#{}>", entry.type_name, module_id.0)),
                    );
                    current = entry.parent;
                }
                None => break,
            }
        }
        parts.reverse();
        parts.join(".")
    }

    /// Hierarchical name of a signal, e.g. `top.alu.out`
    pub fn signal_path(&self, id: SignalId) -> String {
        let Some(entry) = self.signals.get(id.0) else {
            return format!("<unknown#{}>", id.0);
        };
        let name = entry
            .name
            .clone()
            .unwrap_or_else(|| format!("<{}#{}>", entry.kind.description(), id.0));
        match entry.parent {
            Some(parent) => format!("{}.{}", self.module_path(parent), name),
            None => name,
        }
    }

    /// Printable name of any endpoint
    pub fn describe(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::Signal(id) => self.signal_path(id),
            Endpoint::Slice(slice) if slice.width == 1 => {
                format!("{}[{}]", self.signal_path(slice.signal), slice.offset)
            }
            Endpoint::Slice(slice) => format!(
                "{}[{}:{}]",
                self.signal_path(slice.signal),
                slice.offset + slice.width - 1,
                slice.offset
            ),
        }
    }

    /// Find a port of a module by its elaborated name
    pub fn find_port(&self, module: ModuleId, name: &str) -> Option<SignalId> {
        let entry = self.modules.get(module.0)?;
        entry
            .ports
            .iter()
            .copied()
            .find(|id| self.signals[id.0].name.as_deref() == Some(name))
    }

    /// Bound net and bit offset of an endpoint, before canonicalization
    fn bound_range(&self, endpoint: Endpoint) -> SimResult<Option<(NetId, u32, u32)>> {
        let (signal, extra, width) = match endpoint {
            Endpoint::Signal(id) => (id, 0, self.signal(id)?.width),
            Endpoint::Slice(slice) => (slice.signal, slice.offset, slice.width),
        };
        Ok(self
            .signal(signal)?
            .binding
            .map(|binding| (binding.net, binding.offset + extra, width)))
    }

    /// Resolve an endpoint to the narrowest canonical net holding all of
    /// its bits, if it has any storage
    pub fn locate(&self, endpoint: impl Into<Endpoint>) -> SimResult<Option<Location>> {
        let Some((net, offset, width)) = self.bound_range(endpoint.into())? else {
            return Ok(None);
        };
        let (net, offset) = self.store.locate(net, offset, width);
        Ok(Some(Location { net, offset, width }))
    }

    /// Canonical net of an endpoint
    ///
    /// Two endpoints report the same net exactly when they share storage
    /// bit for bit.
    pub fn net_of(&self, endpoint: impl Into<Endpoint>) -> Option<NetId> {
        self.locate(endpoint).ok().flatten().map(|loc| loc.net)
    }

    /// Storage nets holding the bits of an endpoint, low bits first
    ///
    /// A write to the endpoint changes exactly these nets; an endpoint
    /// spans more than one when only part of it is shared with others.
    pub fn nets_of(&self, endpoint: impl Into<Endpoint>) -> Option<Vec<NetId>> {
        let (net, offset, width) = self.bound_range(endpoint.into()).ok().flatten()?;
        Some(
            self.store
                .pieces(net, offset, width)
                .into_iter()
                .map(|piece| piece.net)
                .collect(),
        )
    }

    /// Current value of an endpoint
    pub fn read(&self, endpoint: impl Into<Endpoint>) -> SimResult<u64> {
        let endpoint = endpoint.into();
        match self.bound_range(endpoint)? {
            Some((net, offset, width)) => Ok(self.store.read(net, offset, width)),
            None => Err(SimError::DanglingRead {
                signal: self.describe(endpoint),
            }),
        }
    }

    /// Masked write through an endpoint, without any scheduling
    ///
    /// Returns every storage net written with its new value. The value is
    /// truncated to the endpoint width.
    pub(crate) fn write_raw(
        &mut self,
        endpoint: Endpoint,
        value: u64,
    ) -> SimResult<Vec<(NetId, u64)>> {
        if self.signal(endpoint.signal())?.kind == SignalKind::Constant {
            return Err(SimError::ConstantWrite {
                signal: self.describe(endpoint),
            });
        }
        let Some((net, offset, width)) = self.bound_range(endpoint)? else {
            return Err(SimError::DanglingWrite {
                signal: self.describe(endpoint),
            });
        };
        Ok(self.store.write(net, offset, width, value & mask(width)))
    }

    /// Give an unbound signal a fresh net of its own width
    pub(crate) fn bind_fresh(&mut self, id: SignalId) -> SimResult<Binding> {
        let width = self.signal(id)?.width;
        if let Some(binding) = self.signals[id.0].binding {
            return Ok(binding);
        }
        let net = self.store.allocate(width, 0);
        let binding = Binding { net, offset: 0 };
        self.signals[id.0].binding = Some(binding);
        Ok(binding)
    }

    /// Allocate a private 1-bit wire the kernel can drive (clock/reset fallback)
    pub(crate) fn internal_wire(&mut self, name: &str) -> SimResult<SignalId> {
        let id = self.wire(1)?;
        self.signals[id.0].name = Some(name.to_string());
        Ok(id)
    }
}
