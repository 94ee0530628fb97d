use serde::Serialize;

use crate::ast::ElementKind;
use crate::error::QueryError;

/// Recursion direction, the interpreter's `>`, `>>`, `<` and `<<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Members of ways and relations (`>`)
    Down,
    /// Members, recursively (`>>`)
    DownRecursive,
    /// Ways and relations that hold the elements (`<`)
    Up,
    /// Parents, recursively (`<<`)
    UpRecursive,
}

impl Direction {
    pub fn marker(self) -> &'static str {
        match self {
            Direction::Down => ">",
            Direction::DownRecursive => ">>",
            Direction::Up => "<",
            Direction::UpRecursive => "<<",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Direction::Down),
            ">>" => Ok(Direction::DownRecursive),
            "<" => Ok(Direction::Up),
            "<<" => Ok(Direction::UpRecursive),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

/// Combinator that produced an operation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    /// `(.a; .b;)`
    Union,
    /// `(.a; - .b;)`
    Difference,
    /// `kind.a.b`
    Intersect(ElementKind),
    /// `(.a; >;)` and friends
    Recurse(Direction),
}

impl OperatorKind {
    /// Whether the operator reads a right operand
    pub fn is_binary(self) -> bool {
        !matches!(self, OperatorKind::Recurse(_))
    }
}
