//! The public statement value and its operator algebra.
//!
//! Every combinator reads its operands and returns a new [`Statement`] over a
//! freshly merged [`Environment`]; operands are never touched.
//!
//! | method          | sugar      | printed as              |
//! |-----------------|------------|-------------------------|
//! | `union`         | `&a + &b`  | `(.a;.b;)->.x;`         |
//! | `difference`    | `&a - &b`  | `(.a; - .b;)->.x;`      |
//! | `intersect`     |            | `way.a.b->.x;`          |
//! | `recurse`       |            | `(.a; >;)->.x;`         |
//!
//! `-&a` is rejected: a difference needs a left operand.

use std::ops::{Add, BitOr, Neg, Sub};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::ast::{Direction, ElementKind, Identifier, IntoTagFilter, OperationNode, OperatorKind};
use crate::builder::{AreaSpec, StatementBuilder};
use crate::environment::Environment;
use crate::error::{KindLabel, QueryError, Result};
use crate::naming::NameGenerator;
use crate::output::QueryPrinter;

/// A query expression: a root set name plus the environment that defines it.
///
/// Statements are immutable and cheap to clone; clones share the
/// environment. Two statements are equal when their roots and all three
/// environment maps are equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    root: Identifier,
    environment: Arc<Environment>,
}

impl Statement {
    pub(crate) fn from_parts(root: Identifier, environment: Arc<Environment>) -> Self {
        Statement { root, environment }
    }

    pub fn builder(kind: ElementKind) -> StatementBuilder {
        StatementBuilder::new(kind)
    }

    /// `node` statement over `area`
    pub fn node(tags: impl IntoTagFilter, area: impl Into<AreaSpec>) -> Result<Self> {
        Self::builder(ElementKind::Node).tags(tags).area(area).build()
    }

    /// `way` statement over `area`
    pub fn way(tags: impl IntoTagFilter, area: impl Into<AreaSpec>) -> Result<Self> {
        Self::builder(ElementKind::Way).tags(tags).area(area).build()
    }

    /// `rel` statement over `area`
    pub fn relation(tags: impl IntoTagFilter, area: impl Into<AreaSpec>) -> Result<Self> {
        Self::builder(ElementKind::Relation)
            .tags(tags)
            .area(area)
            .build()
    }

    /// `nwr` statement over `area`
    pub fn nwr(tags: impl IntoTagFilter, area: impl Into<AreaSpec>) -> Result<Self> {
        Self::builder(ElementKind::NodeWayRelation)
            .tags(tags)
            .area(area)
            .build()
    }

    pub fn root(&self) -> &Identifier {
        &self.root
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Element kind of the root set, `None` if it may mix kinds
    pub fn kind(&self) -> Option<ElementKind> {
        self.environment.kind_of(&self.root)
    }

    /// Elements of either statement
    pub fn union(&self, other: &Statement) -> Result<Statement> {
        self.combine(other, OperatorKind::Union, NameGenerator::next())
    }

    /// [`union`](Self::union) bound to an explicit name
    pub fn union_as(&self, other: &Statement, name: &str) -> Result<Statement> {
        self.combine(other, OperatorKind::Union, Identifier::parse(name)?)
    }

    /// Elements of `self` that are not in `other`
    pub fn difference(&self, other: &Statement) -> Result<Statement> {
        self.combine(other, OperatorKind::Difference, NameGenerator::next())
    }

    /// [`difference`](Self::difference) bound to an explicit name
    pub fn difference_as(&self, other: &Statement, name: &str) -> Result<Statement> {
        self.combine(other, OperatorKind::Difference, Identifier::parse(name)?)
    }

    /// Elements of `kind` present in both statements.
    ///
    /// Both operands must already be of `kind`.
    pub fn intersect(&self, other: &Statement, kind: ElementKind) -> Result<Statement> {
        self.intersect_with_id(other, kind, NameGenerator::next())
    }

    /// [`intersect`](Self::intersect) bound to an explicit name
    pub fn intersect_as(
        &self,
        other: &Statement,
        kind: ElementKind,
        name: &str,
    ) -> Result<Statement> {
        self.intersect_with_id(other, kind, Identifier::parse(name)?)
    }

    /// Related elements in `direction`
    pub fn recurse(&self, direction: Direction) -> Result<Statement> {
        self.recurse_with_id(direction, NameGenerator::next())
    }

    /// [`recurse`](Self::recurse) bound to an explicit name
    pub fn recurse_as(&self, direction: Direction, name: &str) -> Result<Statement> {
        self.recurse_with_id(direction, Identifier::parse(name)?)
    }

    /// [`recurse`](Self::recurse) with a textual marker such as `">"`
    pub fn recurse_marker(&self, marker: &str) -> Result<Statement> {
        self.recurse(marker.parse()?)
    }

    /// Left fold of [`union`](Self::union)
    pub fn union_all<'a>(
        &self,
        others: impl IntoIterator<Item = &'a Statement>,
    ) -> Result<Statement> {
        others
            .into_iter()
            .try_fold(self.clone(), |acc, other| acc.union(other))
    }

    /// Left fold of [`difference`](Self::difference)
    pub fn difference_all<'a>(
        &self,
        others: impl IntoIterator<Item = &'a Statement>,
    ) -> Result<Statement> {
        others
            .into_iter()
            .try_fold(self.clone(), |acc, other| acc.difference(other))
    }

    /// Standalone negation has no meaning: there is nothing to subtract from.
    pub fn negate(&self) -> Result<Statement> {
        Err(QueryError::UnaryNegationUnsupported)
    }

    /// Use this statement as the area of a new leaf
    pub fn scope(&self, kind: ElementKind) -> StatementBuilder {
        Statement::builder(kind).area(self)
    }

    /// Printed program, one line per entry
    pub fn to_lines(&self) -> Result<Vec<String>> {
        QueryPrinter::default().lines(self)
    }

    /// Printed program, newline separated
    pub fn to_query(&self) -> Result<String> {
        QueryPrinter::default().print(self)
    }

    fn intersect_with_id(
        &self,
        other: &Statement,
        kind: ElementKind,
        id: Identifier,
    ) -> Result<Statement> {
        let left = self.kind();
        let right = other.kind();
        if left != Some(kind) || right != Some(kind) {
            return Err(QueryError::KindMismatch {
                expected: kind,
                left: KindLabel(left),
                right: KindLabel(right),
            });
        }
        self.combine(other, OperatorKind::Intersect(kind), id)
    }

    fn recurse_with_id(&self, direction: Direction, id: Identifier) -> Result<Statement> {
        let mut env = (*self.environment).clone();
        env.insert_operation(OperationNode {
            id: id.clone(),
            op: OperatorKind::Recurse(direction),
            left: self.root.clone(),
            right: None,
        })?;
        debug!(id = %id, left = %self.root, %direction, "recurse");
        Ok(Statement::from_parts(id, Arc::new(env)))
    }

    fn combine(&self, other: &Statement, op: OperatorKind, id: Identifier) -> Result<Statement> {
        let mut env = self.environment.merge(&other.environment)?;
        env.insert_operation(OperationNode {
            id: id.clone(),
            op,
            left: self.root.clone(),
            right: Some(other.root.clone()),
        })?;
        debug!(id = %id, left = %self.root, right = %other.root, ?op, "combine");
        Ok(Statement::from_parts(id, Arc::new(env)))
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.to_query().map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}

impl<'a> Add for &'a Statement {
    type Output = Result<Statement>;

    fn add(self, other: Self) -> Self::Output {
        self.union(other)
    }
}

impl<'a> BitOr for &'a Statement {
    type Output = Result<Statement>;

    fn bitor(self, other: Self) -> Self::Output {
        self.union(other)
    }
}

impl<'a> Sub for &'a Statement {
    type Output = Result<Statement>;

    fn sub(self, other: Self) -> Self::Output {
        self.difference(other)
    }
}

impl Neg for &Statement {
    type Output = Result<Statement>;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}
