use crate::core::components::design::Design;
use crate::core::components::signal::Binding;
use crate::core::connections::port_validator::PortValidator;
use crate::core::errors::SimResult;
use crate::core::types::{ConnectTarget, Endpoint, SignalId};
use log::trace;

impl Design {
    /// Connect an endpoint to another endpoint or to a raw constant
    ///
    /// Both sides end up observing the same storage. A net is allocated
    /// only when neither side has one yet; when both do, the connected bits
    /// are unified so there is still exactly one net per connected group,
    /// whatever order the connections were made in.
    pub fn connect(
        &mut self,
        left: impl Into<Endpoint>,
        right: impl Into<ConnectTarget>,
    ) -> SimResult<()> {
        let left = left.into();
        match right.into() {
            ConnectTarget::Constant(value) => self.connect_constant(left, value),
            ConnectTarget::Endpoint(right) => self.connect_endpoints(left, right),
        }
    }

    fn connect_constant(&mut self, endpoint: Endpoint, value: u64) -> SimResult<()> {
        let width = self.width_of(endpoint)?;
        let constant = self.constant(width, value)?;
        self.connect_endpoints(endpoint, Endpoint::Signal(constant))
    }

    fn connect_endpoints(&mut self, left: Endpoint, right: Endpoint) -> SimResult<()> {
        let width = PortValidator::validate_widths(self, left, right)?;

        match (self.binding_for(left)?, self.binding_for(right)?) {
            (None, None) => {
                let net = self.store.allocate(width, 0);
                let binding = Binding { net, offset: 0 };
                self.bind(left.signal(), binding);
                self.bind(right.signal(), binding);
            }
            (None, Some(binding)) => self.bind(left.signal(), binding),
            (Some(binding), None) => self.bind(right.signal(), binding),
            (Some(l), Some(r)) => self.unify(left, l, right, r, width),
        }

        trace!(
            "connected {} <-> {}",
            self.describe(left),
            self.describe(right)
        );
        self.signals[left.signal().0].connections.push(right);
        self.signals[right.signal().0].connections.push(left);
        Ok(())
    }

    /// Current binding of an endpoint; slices force their parent onto a net
    fn binding_for(&mut self, endpoint: Endpoint) -> SimResult<Option<Binding>> {
        match endpoint {
            Endpoint::Signal(id) => Ok(self.signal(id)?.binding),
            Endpoint::Slice(slice) => {
                let parent = self.bind_fresh(slice.signal)?;
                Ok(Some(Binding {
                    net: parent.net,
                    offset: parent.offset + slice.offset,
                }))
            }
        }
    }

    fn bind(&mut self, id: SignalId, binding: Binding) {
        self.signals[id.0].binding = Some(binding);
    }

    /// Merge the storage behind two bound endpoints
    ///
    /// Only the connected bits end up shared: nets wider than the
    /// connection are split first, so the remaining bits of either side
    /// keep their own storage.
    fn unify(&mut self, left: Endpoint, l: Binding, right: Endpoint, r: Binding, width: u32) {
        let absorbed = self
            .store
            .join((l.net, l.offset), (r.net, r.offset), width);
        trace!(
            "unified {} with {} over {} bits ({} nets absorbed)",
            self.describe(left),
            self.describe(right),
            width,
            absorbed
        );
    }

    /// Peer endpoints recorded for a signal
    pub fn connections_of(&self, id: SignalId) -> SimResult<&[Endpoint]> {
        Ok(self.signal(id)?.connections())
    }
}
