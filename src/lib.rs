pub mod area;
pub mod ast;
pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod environment;
pub mod error;
pub mod naming;
pub mod output;
pub mod statement;

pub use area::{AreaHandle, AreaSource, Bbox, Coordinates, OverpassAreas, Representation};
pub use ast::{Direction, ElementKind, Identifier, OperatorKind, Tag, TagFilter};
pub use builder::{AreaSpec, StatementBuilder};
pub use environment::Environment;
pub use error::{QueryError, Result};
pub use naming::NameGenerator;
pub use output::{OutputSettings, QueryPrinter, to_query};
pub use statement::Statement;
