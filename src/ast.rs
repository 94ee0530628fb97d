//! # Statement building blocks
//!
//! Plain data that makes up an [`Environment`](crate::Environment):
//!
//! - **[element]** - OSM element kinds (`node`, `way`, `rel`, `nwr`)
//! - **[identifier]** - set names bound with `->.name`
//! - **[tags]** - ordered tag filters (`["key"="value"]`)
//! - **[operators]** - combinators and recursion directions
//! - **[statements]** - named areas, leaf statements and operation nodes
//!
//! ## Printed form
//!
//! ```text
//! way(50.6,7.0,50.8,7.3)->._s1;
//! way._s1["highway"]->._s2;
//! way._s1["highway"="path"]->._s3;
//! (._s2; - ._s3;)->._s4;
//! ```
//!
//! Nothing here is mutated after construction; environments only grow by
//! merging.
pub mod element;
pub mod identifier;
pub mod operators;
pub mod statements;
pub mod tags;

pub use element::ElementKind;
pub use identifier::Identifier;
pub use operators::{Direction, OperatorKind};
pub use statements::{AreaRef, LeafStatement, NamedArea, OperationNode};
pub use tags::{IntoTagFilter, Tag, TagFilter};
