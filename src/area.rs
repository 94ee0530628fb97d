//! Geographic scopes for leaf statements.
//!
//! An [`AreaSource`] turns a bounding box, a coordinate list or a polygon into
//! an [`AreaHandle`]: a named area that can print itself in more than one
//! textual form. Equal input resolves to an equally named handle.
//! [`OverpassAreas`] is the stock source.
//!
//! # Examples
//!
//! ```
//! use harvest_osm::area::{AreaSource, Bbox, OverpassAreas, Representation};
//!
//! let handle = OverpassAreas::default()
//!     .from_bbox(Bbox::new(50.6, 7.1, 50.8, 7.3))
//!     .unwrap();
//! assert_eq!(handle.render(Representation::Bbox), "(50.6,7.1,50.8,7.3)");
//! ```

use geo::{BoundingRect, Polygon};
use serde::Serialize;

use crate::ast::Identifier;
use crate::error::{QueryError, Result};
use crate::naming::NameGenerator;

/// Textual encoding an area is printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// `(south,west,north,east)`
    #[default]
    Bbox,
    /// `(poly:"lat lon lat lon ...")`
    Poly,
}

impl Representation {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bbox" => Some(Self::Bbox),
            "poly" | "polygon" => Some(Self::Poly),
            _ => None,
        }
    }
}

/// Bounding box in degrees, in the interpreter's south/west/north/east order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bbox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bbox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Bbox {
            south,
            west,
            north,
            east,
        }
    }

    fn validate(&self) -> Result<()> {
        let values = [self.south, self.west, self.north, self.east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(QueryError::InvalidArea(format!(
                "bbox {:?} holds a non-finite value",
                values
            )));
        }
        if self.south > self.north {
            return Err(QueryError::InvalidArea(format!(
                "bbox south {} lies north of {}",
                self.south, self.north
            )));
        }
        check_lat(self.south)?;
        check_lat(self.north)?;
        check_lon(self.west)?;
        check_lon(self.east)
    }

    /// Corners as a closed-by-convention polygon, counter-clockwise
    fn corners(&self) -> Vec<(f64, f64)> {
        vec![
            (self.south, self.west),
            (self.south, self.east),
            (self.north, self.east),
            (self.north, self.west),
        ]
    }
}

impl std::str::FromStr for Bbox {
    type Err = QueryError;

    /// Parse `south,west,north,east`
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| QueryError::InvalidArea(format!("bbox {:?}: {}", s, e)))?;
        match parts.as_slice() {
            [south, west, north, east] => Ok(Bbox::new(*south, *west, *north, *east)),
            _ => Err(QueryError::InvalidArea(format!(
                "bbox {:?} needs four values, got {}",
                s,
                parts.len()
            ))),
        }
    }
}

/// Ordered `(lat, lon)` points outlining an area.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Coordinates(pub Vec<(f64, f64)>);

impl Coordinates {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Coordinates(points)
    }

    fn validate(&self) -> Result<()> {
        if self.0.len() < 3 {
            return Err(QueryError::InvalidArea(format!(
                "a polygon needs at least three points, got {}",
                self.0.len()
            )));
        }
        for &(lat, lon) in &self.0 {
            if !lat.is_finite() || !lon.is_finite() {
                return Err(QueryError::InvalidArea(format!(
                    "point ({}, {}) is not finite",
                    lat, lon
                )));
            }
            check_lat(lat)?;
            check_lon(lon)?;
        }
        Ok(())
    }

    fn bbox(&self) -> Bbox {
        let mut bbox = Bbox::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(lat, lon) in &self.0 {
            bbox.south = bbox.south.min(lat);
            bbox.north = bbox.north.max(lat);
            bbox.west = bbox.west.min(lon);
            bbox.east = bbox.east.max(lon);
        }
        bbox
    }
}

impl std::str::FromStr for Coordinates {
    type Err = QueryError;

    /// Parse the poly form `"lat lon lat lon ..."`; commas count as spaces
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(str::parse::<f64>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| QueryError::InvalidArea(format!("coordinates {:?}: {}", s, e)))?;
        if values.len() % 2 != 0 {
            return Err(QueryError::InvalidArea(format!(
                "coordinates {:?} hold an odd number of values",
                s
            )));
        }
        Ok(Coordinates(
            values.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
        ))
    }
}

fn check_lat(lat: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(QueryError::InvalidArea(format!("latitude {} out of range", lat)))
    }
}

fn check_lon(lon: f64) -> Result<()> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(QueryError::InvalidArea(format!("longitude {} out of range", lon)))
    }
}

/// A resolved, named area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaHandle {
    pub name: Identifier,
    pub bbox: Bbox,
    pub poly: Coordinates,
    /// Encoding used when the handle backs a query
    pub out: Representation,
}

impl AreaHandle {
    pub fn new(name: Identifier, bbox: Bbox, poly: Coordinates, out: Representation) -> Self {
        AreaHandle {
            name,
            bbox,
            poly,
            out,
        }
    }

    pub fn render(&self, repr: Representation) -> String {
        match repr {
            Representation::Bbox => bbox_text(&self.bbox),
            Representation::Poly => poly_text(&self.poly),
        }
    }

    /// Render with the handle's own `out` encoding
    pub fn render_default(&self) -> String {
        self.render(self.out)
    }
}

/// Shortest text that reads back as `value`, always with a decimal point
fn degrees(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        text + ".0"
    }
}

fn bbox_text(bbox: &Bbox) -> String {
    format!(
        "({},{},{},{})",
        degrees(bbox.south),
        degrees(bbox.west),
        degrees(bbox.north),
        degrees(bbox.east)
    )
}

fn poly_text(poly: &Coordinates) -> String {
    let points = poly
        .0
        .iter()
        .map(|&(lat, lon)| format!("{} {}", degrees(lat), degrees(lon)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("(poly:\"{}\")", points)
}

/// Handle named after its printed forms, see [`NameGenerator::for_area`]
fn named_handle(bbox: Bbox, poly: Coordinates, out: Representation) -> AreaHandle {
    let key = format!("{}|{}|{:?}", bbox_text(&bbox), poly_text(&poly), out);
    AreaHandle::new(NameGenerator::for_area(&key), bbox, poly, out)
}

/// Resolves geometry input into area handles.
pub trait AreaSource {
    fn from_shape(&self, shape: &Polygon<f64>) -> Result<AreaHandle>;
    fn from_bbox(&self, bbox: Bbox) -> Result<AreaHandle>;
    fn from_coords(&self, coords: &Coordinates) -> Result<AreaHandle>;
}

/// Stock area source: bounding boxes print as bboxes, everything else as
/// polygons, unless a fixed representation is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverpassAreas {
    forced: Option<Representation>,
}

impl OverpassAreas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print every handle from this source with `repr`
    pub fn with_representation(repr: Representation) -> Self {
        OverpassAreas {
            forced: Some(repr),
        }
    }

    fn pick(&self, natural: Representation) -> Representation {
        self.forced.unwrap_or(natural)
    }
}

impl AreaSource for OverpassAreas {
    fn from_shape(&self, shape: &Polygon<f64>) -> Result<AreaHandle> {
        let mut points: Vec<(f64, f64)> =
            shape.exterior().coords().map(|c| (c.y, c.x)).collect();
        // geo closes its rings; the interpreter closes polygons itself
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        let coords = Coordinates(points);
        coords.validate()?;
        let rect = shape
            .bounding_rect()
            .ok_or_else(|| QueryError::InvalidArea("shape has no extent".to_string()))?;
        let bbox = Bbox::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x);
        Ok(named_handle(bbox, coords, self.pick(Representation::Poly)))
    }

    fn from_bbox(&self, bbox: Bbox) -> Result<AreaHandle> {
        bbox.validate()?;
        Ok(named_handle(
            bbox,
            Coordinates(bbox.corners()),
            self.pick(Representation::Bbox),
        ))
    }

    fn from_coords(&self, coords: &Coordinates) -> Result<AreaHandle> {
        coords.validate()?;
        Ok(named_handle(
            coords.bbox(),
            coords.clone(),
            self.pick(Representation::Poly),
        ))
    }
}
