use serde::Serialize;

use crate::area::AreaHandle;
use crate::ast::{ElementKind, Identifier, OperatorKind, TagFilter};

/// Where a leaf statement looks for elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AreaRef {
    /// Back-reference to a set defined earlier in the same environment
    Named(Identifier),
    /// Area printed inline inside the clause
    Direct(AreaHandle),
}

/// A named area, printed as its own `kind(area)->.name;` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedArea {
    /// Kind of the leaves scoped by the area, `nwr` once kinds mix
    pub kind: ElementKind,
    pub handle: AreaHandle,
}

/// One interpreter query clause bound to a name.
///
/// # Example
/// ```text
/// way._s1["highway"="path"]->._s2;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafStatement {
    pub id: Identifier,
    pub kind: ElementKind,
    pub area: AreaRef,
    pub tags: TagFilter,
}

/// Named result of a combinator.
///
/// `right` is `None` exactly for unary operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationNode {
    pub id: Identifier,
    pub op: OperatorKind,
    pub left: Identifier,
    pub right: Option<Identifier>,
}
