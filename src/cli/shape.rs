//! GeoJSON input for shape areas

use geo::{Geometry, Polygon};
use geojson::GeoJson;

use super::CliError;

/// First polygon found in a GeoJSON document (geometry, feature or
/// collection). A multipolygon contributes its first member.
pub fn polygon_from_geojson(text: &str) -> Result<Polygon<f64>, CliError> {
    let geojson: GeoJson = text.parse()?;
    let collection = geojson::quick_collection::<f64>(&geojson)?;
    collection
        .into_iter()
        .find_map(first_polygon)
        .ok_or(CliError::NoShape)
}

fn first_polygon(geometry: Geometry<f64>) -> Option<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(polygon),
        Geometry::MultiPolygon(multi) => multi.into_iter().next(),
        Geometry::GeometryCollection(inner) => inner.into_iter().find_map(first_polygon),
        _ => None,
    }
}
