use std::sync::Arc;

use geo::Polygon;
use tracing::debug;

use crate::area::{AreaHandle, AreaSource, Bbox, Coordinates, OverpassAreas};
use crate::ast::{
    AreaRef, ElementKind, Identifier, IntoTagFilter, LeafStatement, NamedArea, TagFilter,
};
use crate::environment::{Binding, Environment};
use crate::error::{QueryError, Result};
use crate::naming::NameGenerator;
use crate::statement::Statement;

/// The area argument of a leaf statement.
#[derive(Debug, Clone)]
pub enum AreaSpec {
    /// Scope by an existing statement; its environment is carried over
    Named(Statement),
    /// Polygon, resolved by the area source
    Shape(Polygon<f64>),
    /// Bounding box, resolved by the area source
    Bbox(Bbox),
    /// Coordinate ring, resolved by the area source
    Coords(Coordinates),
    /// Already resolved; printed on its own line and shared by name
    Area(AreaHandle),
    /// Already resolved; printed inline instead of on its own line
    Direct(AreaHandle),
}

impl From<Statement> for AreaSpec {
    fn from(st: Statement) -> Self {
        AreaSpec::Named(st)
    }
}

impl From<&Statement> for AreaSpec {
    fn from(st: &Statement) -> Self {
        AreaSpec::Named(st.clone())
    }
}

impl From<Polygon<f64>> for AreaSpec {
    fn from(shape: Polygon<f64>) -> Self {
        AreaSpec::Shape(shape)
    }
}

impl From<Bbox> for AreaSpec {
    fn from(bbox: Bbox) -> Self {
        AreaSpec::Bbox(bbox)
    }
}

impl From<Coordinates> for AreaSpec {
    fn from(coords: Coordinates) -> Self {
        AreaSpec::Coords(coords)
    }
}

impl From<AreaHandle> for AreaSpec {
    fn from(handle: AreaHandle) -> Self {
        AreaSpec::Area(handle)
    }
}

impl From<&AreaHandle> for AreaSpec {
    fn from(handle: &AreaHandle) -> Self {
        AreaSpec::Area(handle.clone())
    }
}

/// Builds one leaf statement.
///
/// Errors from `tags` and `name` are held back and reported by `build`, so
/// the calls chain without `?`.
///
/// # Examples
///
/// ```
/// use harvest_osm::{ElementKind, Statement};
/// use harvest_osm::area::Bbox;
///
/// let hospitals = Statement::builder(ElementKind::Node)
///     .tags("amenity=hospital")
///     .name("hospitals")
///     .area(Bbox::new(50.6, 7.0, 50.8, 7.3))
///     .build()
///     .unwrap();
/// assert_eq!(hospitals.root().as_str(), "hospitals");
/// ```
#[derive(Debug)]
pub struct StatementBuilder {
    kind: ElementKind,
    tags: Result<TagFilter>,
    name: Option<Result<Identifier>>,
    area: Option<AreaSpec>,
}

impl StatementBuilder {
    pub fn new(kind: ElementKind) -> Self {
        StatementBuilder {
            kind,
            tags: Ok(TagFilter::default()),
            name: None,
            area: None,
        }
    }

    pub fn tags(mut self, tags: impl IntoTagFilter) -> Self {
        self.tags = tags.into_tag_filter();
        self
    }

    /// Bind the statement to an explicit set name instead of a generated one
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(Identifier::parse(name));
        self
    }

    /// Set the area. Only the first call counts; later ones are ignored.
    pub fn area(mut self, area: impl Into<AreaSpec>) -> Self {
        if self.area.is_none() {
            self.area = Some(area.into());
        }
        self
    }

    pub fn build(self) -> Result<Statement> {
        self.build_with(&OverpassAreas::default())
    }

    /// Build, resolving geometry through `source`
    pub fn build_with(self, source: &dyn AreaSource) -> Result<Statement> {
        let tags = self.tags?;
        let area = self.area.ok_or(QueryError::AreaMissing)?;
        let id = match self.name {
            Some(name) => name?,
            None => NameGenerator::next(),
        };

        let (mut env, area_ref) = match area {
            AreaSpec::Named(scope) => {
                if scope.environment().binding(scope.root()) == Some(Binding::Operation) {
                    return Err(QueryError::UnsupportedAreaReference(scope.root().clone()));
                }
                (
                    scope.environment().clone(),
                    AreaRef::Named(scope.root().clone()),
                )
            }
            AreaSpec::Direct(handle) => (Environment::new(), AreaRef::Direct(handle)),
            AreaSpec::Area(handle) => seed(self.kind, handle)?,
            AreaSpec::Shape(shape) => seed(self.kind, source.from_shape(&shape)?)?,
            AreaSpec::Bbox(bbox) => seed(self.kind, source.from_bbox(bbox)?)?,
            AreaSpec::Coords(coords) => seed(self.kind, source.from_coords(&coords)?)?,
        };

        env.insert_statement(LeafStatement {
            id: id.clone(),
            kind: self.kind,
            area: area_ref,
            tags,
        })?;
        debug!(id = %id, kind = %self.kind, "leaf statement");

        Ok(Statement::from_parts(id, Arc::new(env)))
    }
}

/// Fresh environment holding just the named area
fn seed(kind: ElementKind, handle: AreaHandle) -> Result<(Environment, AreaRef)> {
    let mut env = Environment::new();
    let name = handle.name.clone();
    env.insert_area(NamedArea { kind, handle })?;
    debug!(area = %name, "named area");
    Ok((env, AreaRef::Named(name)))
}
