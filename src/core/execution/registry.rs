use crate::core::errors::SimResult;
use crate::core::execution::cycle_engine::Context;
use crate::core::types::{Endpoint, FnId};

/// Body of an update function
pub type UpdateFn = Box<dyn FnMut(&mut Context<'_>) -> SimResult<()>>;

/// How the kernel invokes a registered function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Re-run whenever a net in its sensitivity set is written
    Combinational { sensitivity: Vec<Endpoint> },
    /// Run once per rising clock edge, before register commit
    Edge,
}

impl Role {
    pub fn is_combinational(&self) -> bool {
        matches!(self, Role::Combinational { .. })
    }
}

pub(crate) struct FunctionEntry {
    pub(crate) name: String,
    pub(crate) role: Role,
    pub(crate) func: UpdateFn,
}

/// Registration table: every update function with its role
///
/// Built once, at kernel construction, from each model's
/// [`Model::register`](crate::core::components::Model::register) hook.
#[derive(Default)]
pub struct FunctionTable {
    entries: Vec<FunctionEntry>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: String, role: Role, func: UpdateFn) -> FnId {
        let id = FnId(self.entries.len());
        self.entries.push(FunctionEntry { name, role, func });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Qualified name of a function, e.g. `top.alu.compute`
    pub fn name(&self, id: FnId) -> &str {
        self.entries
            .get(id.0)
            .map_or("<unknown>", |entry| entry.name.as_str())
    }

    pub fn role(&self, id: FnId) -> Option<&Role> {
        self.entries.get(id.0).map(|entry| &entry.role)
    }

    /// Look a function up by its qualified name
    pub fn find(&self, name: &str) -> Option<FnId> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map(FnId)
    }

    /// All function ids with their roles, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (FnId, &str, &Role)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (FnId(i), entry.name.as_str(), &entry.role))
    }

    pub(crate) fn entry_mut(&mut self, id: FnId) -> Option<&mut FunctionEntry> {
        self.entries.get_mut(id.0)
    }
}

/// Handle passed to [`Model::register`](crate::core::components::Model::register)
///
/// Names are qualified with the module's hierarchical path.
pub struct Registrar<'t> {
    table: &'t mut FunctionTable,
    scope: String,
}

impl<'t> Registrar<'t> {
    pub(crate) fn new(table: &'t mut FunctionTable, scope: String) -> Self {
        Self { table, scope }
    }

    /// Hierarchical path of the module being registered
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Register a combinational function with its explicit sensitivity set
    pub fn combinational<E, I, F>(&mut self, name: &str, sensitivity: I, func: F) -> FnId
    where
        E: Into<Endpoint>,
        I: IntoIterator<Item = E>,
        F: FnMut(&mut Context<'_>) -> SimResult<()> + 'static,
    {
        let sensitivity = sensitivity.into_iter().map(Into::into).collect();
        let name = self.qualify(name);
        self.table
            .push(name, Role::Combinational { sensitivity }, Box::new(func))
    }

    /// Register an edge-triggered function
    pub fn posedge<F>(&mut self, name: &str, func: F) -> FnId
    where
        F: FnMut(&mut Context<'_>) -> SimResult<()> + 'static,
    {
        let name = self.qualify(name);
        self.table.push(name, Role::Edge, Box::new(func))
    }

    /// Extend the sensitivity set of an already registered combinational function
    ///
    /// Has no effect on edge-triggered functions.
    pub fn sensitive_to<E, I>(&mut self, id: FnId, endpoints: I)
    where
        E: Into<Endpoint>,
        I: IntoIterator<Item = E>,
    {
        if let Some(FunctionEntry {
            role: Role::Combinational { sensitivity },
            ..
        }) = self.table.entry_mut(id)
        {
            sensitivity.extend(endpoints.into_iter().map(Into::into));
        }
    }

    fn qualify(&self, name: &str) -> String {
        if self.scope.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.scope, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SignalId;

    #[test]
    fn test_registration_records_roles_in_order() {
        let mut table = FunctionTable::new();
        let mut registrar = Registrar::new(&mut table, "top".to_string());
        let comb = registrar.combinational("logic", [SignalId(0)], |_| Ok(()));
        let edge = registrar.posedge("seq", |_| Ok(()));

        assert_eq!(table.len(), 2);
        assert_eq!(table.name(comb), "top.logic");
        assert_eq!(table.name(edge), "top.seq");
        assert!(table.role(comb).unwrap().is_combinational());
        assert_eq!(table.role(edge), Some(&Role::Edge));
        assert_eq!(table.find("top.seq"), Some(edge));
    }

    #[test]
    fn test_sensitive_to_extends_set() {
        let mut table = FunctionTable::new();
        let mut registrar = Registrar::new(&mut table, String::new());
        let id = registrar.combinational("f", Vec::<SignalId>::new(), |_| Ok(()));
        registrar.sensitive_to(id, [SignalId(3), SignalId(4)]);

        match table.role(id) {
            Some(Role::Combinational { sensitivity }) => assert_eq!(sensitivity.len(), 2),
            other => panic!("unexpected role {:?}", other),
        }
        assert_eq!(table.name(id), "f");
    }
}
