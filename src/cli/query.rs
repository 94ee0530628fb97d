//! Build and print a query from command line options

use crate::area::{AreaSource, Bbox, Coordinates, OverpassAreas, Representation};
use crate::output::{OutputSettings, QueryPrinter};
use crate::{ElementKind, QueryError, Statement};

use super::{CliError, polygon_from_geojson};

/// Options for the query command
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub kind: ElementKind,
    /// Comma-separated tag tokens
    pub tags: String,
    /// Explicit set name of the main statement
    pub name: Option<String>,
    /// `south,west,north,east`
    pub bbox: Option<String>,
    /// `lat lon lat lon ...`
    pub coords: Option<String>,
    /// GeoJSON text holding a polygon
    pub shape: Option<String>,
    /// Tags of a second statement over the same area to subtract
    pub exclude: Option<String>,
    /// Recursion marker applied last
    pub recurse: Option<String>,
    /// Force one area encoding
    pub representation: Option<Representation>,
    pub settings: OutputSettings,
    /// Print the statement structure as JSON instead of query text
    pub json: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            kind: ElementKind::NodeWayRelation,
            tags: String::new(),
            name: None,
            bbox: None,
            coords: None,
            shape: None,
            exclude: None,
            recurse: None,
            representation: None,
            settings: OutputSettings::default(),
            json: false,
        }
    }
}

/// Result of a query command
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Query program text
    Query(String),
    /// Statement structure
    Json(String),
}

/// Build the statement described by `options` and print it
pub fn execute_query(options: &QueryOptions) -> Result<QueryOutput, CliError> {
    let source = match options.representation {
        Some(repr) => OverpassAreas::with_representation(repr),
        None => OverpassAreas::new(),
    };

    // Area flags are offered in this order; the first one given wins.
    let area = if let Some(bbox) = &options.bbox {
        source.from_bbox(bbox.parse::<Bbox>()?)?
    } else if let Some(coords) = &options.coords {
        source.from_coords(&coords.parse::<Coordinates>()?)?
    } else if let Some(shape) = &options.shape {
        source.from_shape(&polygon_from_geojson(shape)?)?
    } else {
        return Err(QueryError::AreaMissing.into());
    };

    let mut keep = Statement::builder(options.kind)
        .tags(options.tags.as_str())
        .area(&area);
    if let Some(name) = &options.name {
        keep = keep.name(name);
    }
    let mut statement = keep.build()?;

    if let Some(exclude) = &options.exclude {
        let drop = Statement::builder(options.kind)
            .tags(exclude.as_str())
            .area(&area)
            .build()?;
        statement = statement.difference(&drop)?;
    }

    if let Some(marker) = &options.recurse {
        statement = statement.recurse_marker(marker)?;
    }

    if options.json {
        return Ok(QueryOutput::Json(serde_json::to_string_pretty(&statement)?));
    }
    let text = QueryPrinter::new(options.settings).print(&statement)?;
    Ok(QueryOutput::Query(text))
}
