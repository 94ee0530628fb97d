use indexmap::IndexMap;
use serde::Serialize;

use crate::ast::{ElementKind, Identifier, LeafStatement, NamedArea, OperationNode, OperatorKind};
use crate::error::{QueryError, Result};

/// Which of the three namespaces an identifier is bound in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Area,
    Statement,
    Operation,
}

/// Ordered namespace backing a [`Statement`](crate::Statement).
///
/// Three maps keyed by identifier: named areas, leaf statements and
/// operation nodes. Insertion order is emission order. An identifier lives in
/// at most one of the maps. Environments only grow inside this crate and are
/// read-only once a statement holds them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Environment {
    named_areas: IndexMap<Identifier, NamedArea>,
    statements: IndexMap<Identifier, LeafStatement>,
    operations: IndexMap<Identifier, OperationNode>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named_areas(&self) -> impl Iterator<Item = (&Identifier, &NamedArea)> {
        self.named_areas.iter()
    }

    pub fn statements(&self) -> impl Iterator<Item = (&Identifier, &LeafStatement)> {
        self.statements.iter()
    }

    pub fn operations(&self) -> impl Iterator<Item = (&Identifier, &OperationNode)> {
        self.operations.iter()
    }

    pub fn statement(&self, id: &Identifier) -> Option<&LeafStatement> {
        self.statements.get(id)
    }

    pub fn operation(&self, id: &Identifier) -> Option<&OperationNode> {
        self.operations.get(id)
    }

    pub fn binding(&self, id: &Identifier) -> Option<Binding> {
        if self.named_areas.contains_key(id) {
            Some(Binding::Area)
        } else if self.statements.contains_key(id) {
            Some(Binding::Statement)
        } else if self.operations.contains_key(id) {
            Some(Binding::Operation)
        } else {
            None
        }
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.binding(id).is_some()
    }

    /// Total number of bound entries
    pub fn len(&self) -> usize {
        self.named_areas.len() + self.statements.len() + self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element kind of the set bound to `id`, `None` when it may mix kinds.
    pub fn kind_of(&self, id: &Identifier) -> Option<ElementKind> {
        if let Some(area) = self.named_areas.get(id) {
            return Some(area.kind);
        }
        if let Some(leaf) = self.statements.get(id) {
            return Some(leaf.kind);
        }
        let node = self.operations.get(id)?;
        match node.op {
            OperatorKind::Union => {
                let left = self.kind_of(&node.left)?;
                let right = self.kind_of(node.right.as_ref()?)?;
                (left == right).then_some(left)
            }
            OperatorKind::Difference => self.kind_of(&node.left),
            OperatorKind::Intersect(kind) => Some(kind),
            OperatorKind::Recurse(_) => None,
        }
    }

    /// Fails unless `id` is free, or already bound in `want` to an equal entry.
    ///
    /// Returns `true` when the equal entry is already present.
    fn claim<T: PartialEq>(
        &self,
        id: &Identifier,
        want: Binding,
        existing: Option<&T>,
        entry: &T,
    ) -> Result<bool> {
        match (self.binding(id), existing) {
            (None, _) => Ok(false),
            (Some(b), Some(current)) if b == want && current == entry => Ok(true),
            _ => Err(QueryError::NameConflict(id.clone())),
        }
    }

    /// Areas are identified by their handle. An area shared by leaves of
    /// different kinds widens to `nwr`, whichever side arrived first.
    pub(crate) fn insert_area(&mut self, area: NamedArea) -> Result<()> {
        let id = area.handle.name.clone();
        let existing = self.named_areas.get(&id).map(|a| &a.handle);
        if !self.claim(&id, Binding::Area, existing, &area.handle)? {
            self.named_areas.insert(id, area);
        } else if let Some(current) = self.named_areas.get_mut(&id) {
            if current.kind != area.kind {
                current.kind = ElementKind::NodeWayRelation;
            }
        }
        Ok(())
    }

    pub(crate) fn insert_statement(&mut self, leaf: LeafStatement) -> Result<()> {
        let id = leaf.id.clone();
        if !self.claim(&id, Binding::Statement, self.statements.get(&id), &leaf)? {
            self.statements.insert(id, leaf);
        }
        Ok(())
    }

    pub(crate) fn insert_operation(&mut self, node: OperationNode) -> Result<()> {
        let id = node.id.clone();
        if !self.claim(&id, Binding::Operation, self.operations.get(&id), &node)? {
            self.operations.insert(id, node);
        }
        Ok(())
    }

    /// Set-union by identifier: `self`'s entries first, then whatever `other`
    /// adds beyond them, each map in its own insertion order.
    pub fn merge(&self, other: &Environment) -> Result<Environment> {
        let mut merged = self.clone();
        for area in other.named_areas.values() {
            merged.insert_area(area.clone())?;
        }
        for leaf in other.statements.values() {
            merged.insert_statement(leaf.clone())?;
        }
        for node in other.operations.values() {
            merged.insert_operation(node.clone())?;
        }
        Ok(merged)
    }
}
