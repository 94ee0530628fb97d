//! CLI support for harvest-osm
//!
//! Builds a statement from flat command line options and prints the query
//! text. Kept in the library so other tools can drive it without a shell.

mod query;
mod shape;

pub use query::{QueryOptions, QueryOutput, execute_query};
pub use shape::polygon_from_geojson;

use std::io;
use std::sync::Once;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Query error: {0}")]
    Query(#[from] crate::QueryError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// GeoJSON input without a polygon in it
    #[error("No polygon found in the GeoJSON input")]
    NoShape,

    #[error("Unknown {what}: '{value}'")]
    UnknownValue { what: &'static str, value: String },
}

static TRACING_INIT: Once = Once::new();

/// Install a log subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=harvest_osm=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(io::stderr))
                .with(filter)
                .init();
        }
    });
}
