use crate::core::components::design::Design;
use crate::core::components::module::{Member, Model};
use crate::core::errors::{SimResult, StructuralError};
use crate::core::types::{ModuleId, SignalId, SignalKind};
use log::{info, warn};

/// Counts gathered while walking a hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElaborationSummary {
    pub modules: usize,
    pub ports: usize,
    pub wires: usize,
    /// Members skipped because they were constants
    pub ignored: usize,
}

/// One-shot walk of a model tree that names and parents every member
///
/// Each module is entered once; ports and wires are claimed by exactly one
/// module, sequences are flattened as `<name>_<index>`. A failed walk
/// leaves the design as it found it.
pub struct Elaborator<'d> {
    design: &'d mut Design,
    summary: ElaborationSummary,
    entered: Vec<ModuleId>,
    claimed: Vec<SignalId>,
}

impl<'d> Elaborator<'d> {
    pub fn new(design: &'d mut Design) -> Self {
        Self {
            design,
            summary: ElaborationSummary::default(),
            entered: Vec::new(),
            claimed: Vec::new(),
        }
    }

    /// Elaborate `top` under `name` and make it the design's top module
    pub fn run(mut self, top: &dyn Model, name: &str) -> SimResult<ElaborationSummary> {
        if let Some(existing) = self.design.top {
            return Err(StructuralError::AlreadyElaborated {
                module: self.design.module_path(existing),
            }
            .into());
        }
        let id = match self.enter(top, name, None) {
            Ok(id) => id,
            Err(err) => {
                self.rollback();
                return Err(err);
            }
        };
        self.design.top = Some(id);
        info!(
            "elaborated '{}': {} modules, {} ports, {} wires",
            name, self.summary.modules, self.summary.ports, self.summary.wires
        );
        Ok(self.summary)
    }

    fn enter(
        &mut self,
        model: &dyn Model,
        name: &str,
        parent: Option<ModuleId>,
    ) -> SimResult<ModuleId> {
        let id = model.module_id();
        let entry = self.design.module_mut(id)?;
        if entry.elaborated {
            let module = self.design.module_path(id);
            return Err(StructuralError::AlreadyElaborated { module }.into());
        }
        entry.elaborated = true;
        entry.name = Some(name.to_string());
        entry.parent = parent;
        self.entered.push(id);
        self.summary.modules += 1;

        for (member_name, member) in model.members() {
            self.classify(id, &member_name, member)?;
        }
        Ok(id)
    }

    fn classify(&mut self, owner: ModuleId, name: &str, member: Member<'_>) -> SimResult<()> {
        match member {
            Member::Signal(signal) => self.claim(owner, name, signal),
            Member::Module(child) => {
                let child = self.enter(child, name, Some(owner))?;
                self.design.module_mut(owner)?.submodules.push(child);
                Ok(())
            }
            Member::List(items) => {
                for (i, item) in items.into_iter().enumerate() {
                    self.classify(owner, &format!("{}_{}", name, i), item)?;
                }
                Ok(())
            }
        }
    }

    fn claim(&mut self, owner: ModuleId, name: &str, signal: SignalId) -> SimResult<()> {
        let entry = self.design.signal(signal)?;
        let kind = entry.kind;
        if kind == SignalKind::Constant {
            warn!(
                "ignoring constant member '{}' of {}",
                name,
                self.design.module_path(owner)
            );
            self.summary.ignored += 1;
            return Ok(());
        }
        if let Some(previous) = entry.parent {
            return Err(StructuralError::SignalAlreadyOwned {
                signal: format!("{}.{}", self.design.module_path(owner), name),
                owner: self.design.module_path(previous),
            }
            .into());
        }

        let entry = self.design.signal_mut(signal)?;
        entry.name = Some(name.to_string());
        entry.parent = Some(owner);
        self.claimed.push(signal);

        let module = self.design.module_mut(owner)?;
        if kind.is_port() {
            module.ports.push(signal);
            self.summary.ports += 1;
        } else {
            module.wires.push(signal);
            self.summary.wires += 1;
        }
        Ok(())
    }

    /// Undo everything a failed walk assigned
    fn rollback(&mut self) {
        warn!(
            "elaboration failed, releasing {} modules and {} signals",
            self.entered.len(),
            self.claimed.len()
        );
        for id in self.entered.drain(..) {
            if let Some(entry) = self.design.modules.get_mut(id.0) {
                entry.elaborated = false;
                entry.name = None;
                entry.parent = None;
                entry.ports.clear();
                entry.wires.clear();
                entry.submodules.clear();
            }
        }
        for id in self.claimed.drain(..) {
            if let Some(entry) = self.design.signals.get_mut(id.0) {
                entry.name = None;
                entry.parent = None;
            }
        }
    }
}

impl Design {
    /// Name and parent the whole hierarchy below `top`; done once per design
    pub fn elaborate(&mut self, top: &dyn Model, name: &str) -> SimResult<ModuleId> {
        Elaborator::new(self).run(top, name)?;
        Ok(top.module_id())
    }
}
