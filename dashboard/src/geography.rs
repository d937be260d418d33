use crate::config::{ChartSize, ProjectionConfig};
use anyhow::{Result, anyhow};
use geo::{Centroid, Contains, Coord, MapCoords, MultiPolygon, Polygon};
use geojson::{GeoJson, Value};
use log::{debug, warn};
use std::f64::consts::FRAC_PI_4;

pub type Point = (f64, f64);

/// Spherical Mercator projection centred on a longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    offset: Point,
}

impl Mercator {
    /// Places `config.center` at the middle of `size`.
    pub fn new(config: &ProjectionConfig, size: ChartSize) -> Self {
        let (cx, cy) = Self::raw(config.center);
        let scale = config.scale;
        Self {
            scale,
            offset: (
                size.width / 2.0 - scale * cx,
                size.height / 2.0 + scale * cy,
            ),
        }
    }

    fn raw((longitude, latitude): Point) -> Point {
        let lambda = longitude.to_radians();
        let phi = latitude.to_radians();
        (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
    }

    /// Projects degrees of longitude/latitude onto pixels.
    pub fn project(&self, position: Point) -> Point {
        let (x, y) = Self::raw(position);
        (self.offset.0 + self.scale * x, self.offset.1 - self.scale * y)
    }
}

/// A first-level administrative division, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub shape: MultiPolygon<f64>,
}

impl Region {
    pub fn new(name: impl Into<String>, shape: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// The outline in pixels.
    pub fn project(&self, projection: &Mercator) -> MultiPolygon<f64> {
        let projection = *projection;
        self.shape.map_coords(move |c| {
            let (x, y) = projection.project((c.x, c.y));
            Coord { x, y }
        })
    }
}

/// Area centroid of a projected outline, where its label goes.
pub fn label_position(outline: &MultiPolygon<f64>) -> Option<Point> {
    outline.centroid().map(|p| p.x_y())
}

/// Whether a pixel falls inside an outline. Holes are outside.
pub fn outline_contains(outline: &MultiPolygon<f64>, (x, y): Point) -> bool {
    outline.contains(&geo::Point::new(x, y))
}

/// Parses a feature collection whose features carry a `STATE_NAME` property.
pub fn parse_regions(text: &str) -> Result<Vec<Region>> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(anyhow!("Geography is not a feature collection"));
    };

    let mut regions = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = feature
            .property("STATE_NAME")
            .and_then(|name| name.as_str())
            .map(str::to_owned)
        else {
            warn!("Skipping feature #{i} without a STATE_NAME");
            continue;
        };
        let shape = match feature.geometry.map(|g| g.value) {
            Some(value @ Value::Polygon(_)) => MultiPolygon::new(vec![Polygon::try_from(value)?]),
            Some(value @ Value::MultiPolygon(_)) => MultiPolygon::try_from(value)?,
            other => {
                warn!(
                    "Skipping {name}: unsupported geometry {:?}",
                    other.as_ref().map(Value::type_name)
                );
                continue;
            }
        };
        debug!("Region {name}: {} polygons", shape.0.len());
        regions.push(Region { name, shape });
    }
    Ok(regions)
}
