use thiserror::Error;

use crate::ast::{ElementKind, Identifier};

/// Errors raised while building or printing a statement.
///
/// Every variant stems from deterministic input, so none of them is worth
/// retrying. `DanglingReference` is the odd one out: it signals a broken
/// environment rather than bad user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A tag token is neither `key` nor `key=value`
    #[error("Tag syntax error: {token:?} is not of the form key or key=value")]
    TagSyntax { token: String },

    /// A builder was finished without any area argument
    #[error("No area given: use a bbox, coordinates, a shape or another statement")]
    AreaMissing,

    /// Intersection between statements of a different element kind
    #[error("Kind mismatch: cannot intersect {left} with {right} as {expected}")]
    KindMismatch {
        expected: ElementKind,
        left: KindLabel,
        right: KindLabel,
    },

    /// Negation without a left operand
    #[error(
        "Standalone negative statement: subtract from another statement instead (e.g. st1 - st2)"
    )]
    UnaryNegationUnsupported,

    /// An operator marker that has no rendering
    #[error("Operator {0:?} is not supported")]
    UnknownOperator(String),

    /// A line would reference a set that is not defined yet
    #[error("Dangling reference: .{id} is used before it is defined (line {line})")]
    DanglingReference { id: Identifier, line: usize },

    /// The same identifier is bound to two different entries
    #[error("Name conflict: .{0} is already bound to a different entry")]
    NameConflict(Identifier),

    /// An explicit name that is not a valid set name
    #[error("Invalid name {0:?}: not a set name, or reserved for generated names")]
    InvalidName(String),

    /// Degenerate or non-finite area input
    #[error("Invalid area: {0}")]
    InvalidArea(String),

    /// An area statement that would be printed after its users
    #[error("Statement .{0} is an operation result and cannot scope another statement")]
    UnsupportedAreaReference(Identifier),
}

/// Element kind of an operand as seen by an intersection, `mixed` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindLabel(pub Option<ElementKind>);

impl std::fmt::Display for KindLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(kind) => write!(f, "{}", kind),
            None => write!(f, "mixed"),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
