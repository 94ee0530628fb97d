//! Query text output.
//!
//! Walks a statement's environment in canonical order and prints one line
//! per entry:
//!
//! 1. named areas, `way(50.6,7.1,50.8,7.3)->._s1;`
//! 2. leaf statements, `way._s1["highway"]->._s2;`
//! 3. operation nodes, `(._s2; >;)->._s3;`
//!
//! Each map keeps its insertion order. Every name a line refers to is bound
//! on an earlier line; a violation is reported as
//! [`QueryError::DanglingReference`] rather than printed.
//!
//! # Examples
//!
//! ```
//! use harvest_osm::Statement;
//! use harvest_osm::area::Bbox;
//! use harvest_osm::output::{OutFormat, OutputSettings, QueryPrinter};
//!
//! let st = Statement::builder(harvest_osm::ElementKind::Node)
//!     .tags("amenity=hospital")
//!     .name("hospitals")
//!     .area(Bbox::new(50.6, 7.1, 50.8, 7.3))
//!     .build()
//!     .unwrap();
//!
//! let printer = QueryPrinter::new(OutputSettings {
//!     format: Some(OutFormat::Json),
//!     ..OutputSettings::default()
//! });
//! let text = printer.print(&st).unwrap();
//! assert!(text.starts_with("[out:json];\n"));
//! assert!(text.contains("[\"amenity\"=\"hospital\"]->.hospitals;"));
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::ast::{AreaRef, Identifier, OperationNode, OperatorKind};
use crate::error::{QueryError, Result};
use crate::statement::Statement;

/// `[out:...]` setting of the program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutFormat {
    Json,
    Xml,
}

impl OutFormat {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            OutFormat::Json => "json",
            OutFormat::Xml => "xml",
        }
    }
}

/// Detail level of the closing `out` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutVerbosity {
    Ids,
    Skel,
    Body,
    Tags,
    Meta,
}

impl OutVerbosity {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ids" => Some(Self::Ids),
            "skel" => Some(Self::Skel),
            "body" => Some(Self::Body),
            "tags" => Some(Self::Tags),
            "meta" => Some(Self::Meta),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            OutVerbosity::Ids => "ids",
            OutVerbosity::Skel => "skel",
            OutVerbosity::Body => "body",
            OutVerbosity::Tags => "tags",
            OutVerbosity::Meta => "meta",
        }
    }
}

/// Optional header and footer around the statement lines.
///
/// The default prints the statements alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutputSettings {
    /// `[out:json]`
    pub format: Option<OutFormat>,
    /// `[timeout:25]`, in seconds
    pub timeout: Option<u32>,
    /// Closing `.root out body;`
    pub out: Option<OutVerbosity>,
    /// Append `geom` to the closing `out`
    pub geometry: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QueryPrinter {
    settings: OutputSettings,
}

impl QueryPrinter {
    pub fn new(settings: OutputSettings) -> Self {
        QueryPrinter { settings }
    }

    pub fn print(&self, statement: &Statement) -> Result<String> {
        Ok(self.lines(statement)?.join("\n"))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(root = %statement.root()))]
    pub fn lines(&self, statement: &Statement) -> Result<Vec<String>> {
        let env = statement.environment();
        let mut printer = LinePrinter::default();

        if let Some(header) = self.header() {
            printer.lines.push(header);
        }

        for (id, area) in env.named_areas() {
            printer.bind(
                id,
                format!("{}{}->.{};", area.kind, area.handle.render_default(), id),
            );
        }

        for (id, leaf) in env.statements() {
            let area = match &leaf.area {
                AreaRef::Named(area_id) => {
                    printer.require(area_id)?;
                    format!(".{}", area_id)
                }
                AreaRef::Direct(handle) => handle.render_default(),
            };
            printer.bind(
                id,
                format!("{}{}{}->.{};", leaf.kind, area, leaf.tags.render(), id),
            );
        }

        for (id, node) in env.operations() {
            printer.require(&node.left)?;
            if let Some(right) = &node.right {
                printer.require(right)?;
            }
            let line = render_operation(node)?;
            printer.bind(id, line);
        }

        printer.require(statement.root())?;
        if let Some(out) = self.settings.out {
            let geom = if self.settings.geometry { " geom" } else { "" };
            printer
                .lines
                .push(format!(".{} out {}{};", statement.root(), out.keyword(), geom));
        }

        tracing::trace!(lines = printer.lines.len(), "printed");
        Ok(printer.lines)
    }

    fn header(&self) -> Option<String> {
        let mut header = String::new();
        if let Some(format) = self.settings.format {
            header.push_str(&format!("[out:{}]", format.keyword()));
        }
        if let Some(timeout) = self.settings.timeout {
            header.push_str(&format!("[timeout:{}]", timeout));
        }
        (!header.is_empty()).then(|| header + ";")
    }
}

/// Lines printed so far and the names they bind
#[derive(Default)]
struct LinePrinter<'a> {
    lines: Vec<String>,
    defined: HashSet<&'a Identifier>,
}

impl<'a> LinePrinter<'a> {
    fn bind(&mut self, id: &'a Identifier, line: String) {
        self.defined.insert(id);
        self.lines.push(line);
    }

    fn require(&self, id: &Identifier) -> Result<()> {
        if self.defined.contains(id) {
            Ok(())
        } else {
            Err(QueryError::DanglingReference {
                id: id.clone(),
                line: self.lines.len() + 1,
            })
        }
    }
}

fn render_operation(node: &OperationNode) -> Result<String> {
    let right = || {
        node.right.as_ref().ok_or_else(|| {
            QueryError::UnknownOperator(format!("{:?} without right operand", node.op))
        })
    };
    let line = match node.op {
        OperatorKind::Union => format!("(.{};.{};)->.{};", node.left, right()?, node.id),
        OperatorKind::Difference => format!("(.{}; - .{};)->.{};", node.left, right()?, node.id),
        OperatorKind::Recurse(direction) => {
            format!("(.{}; {};)->.{};", node.left, direction, node.id)
        }
        OperatorKind::Intersect(kind) => {
            format!("{}.{}.{}->.{};", kind, node.left, right()?, node.id)
        }
    };
    Ok(line)
}

/// Converts a statement to query text with default settings.
pub fn to_query(statement: &Statement) -> Result<String> {
    QueryPrinter::default().print(statement)
}

/// Statement structure as pretty JSON, for inspection.
pub fn to_json_pretty(statement: &Statement) -> serde_json::Result<String> {
    serde_json::to_string_pretty(statement)
}
