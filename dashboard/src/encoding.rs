//! Builders for the visual encodings shared by the renderers.

use crate::config::Config;
use crate::geography::Mercator;
use crate::scale::{BandScale, DivergingScale, LinearScale, OrdinalScale};
use crate::shape::Arc;
use anyhow::Result;
use ordered_float::OrderedFloat;

/// Net migration at which the marker color saturates.
pub const MIGRATION_EXTENT: f64 = 1000.0;

/// Every scale, projection and arc generator the dashboard draws with.
#[derive(Debug, Clone)]
pub struct Encodings {
    /// Keyed by draw order, shared by the map and the bar chart.
    pub region_colors: OrdinalScale<usize>,
    /// Keyed by employment value, not by industry.
    pub industry_colors: OrdinalScale<OrderedFloat<f64>>,
    pub migration: DivergingScale,
    pub projection: Mercator,
    pub bar_x: BandScale,
    pub bar_y: LinearScale,
    pub donut: DonutArcs,
}

impl Encodings {
    pub fn new(config: &Config) -> Result<Self> {
        let bar = config.bar_inner();
        Ok(Self {
            region_colors: build_region_scale(config)?,
            industry_colors: build_industry_scale(config)?,
            migration: build_migration_scale(config)?,
            projection: build_projection(config),
            bar_x: build_bar_xscale(bar.width),
            bar_y: build_bar_yscale(bar.height),
            donut: DonutArcs::new(config.donut_radius()),
        })
    }
}

pub fn build_region_scale(config: &Config) -> Result<OrdinalScale<usize>> {
    Ok(OrdinalScale::new(config.palettes.region_colors()?))
}

pub fn build_industry_scale(config: &Config) -> Result<OrdinalScale<OrderedFloat<f64>>> {
    Ok(OrdinalScale::new(config.palettes.industry_colors()?))
}

pub fn build_migration_scale(config: &Config) -> Result<DivergingScale> {
    let (low, high) = config.palettes.migration_colors()?;
    Ok(DivergingScale::new(
        (-MIGRATION_EXTENT, MIGRATION_EXTENT),
        low,
        high,
    ))
}

pub fn build_projection(config: &Config) -> Mercator {
    Mercator::new(&config.projection, config.map_inner())
}

pub fn build_bar_xscale(width: f64) -> BandScale {
    BandScale::new((0.0, width), 0.1)
}

/// The domain is filled in per load.
pub fn build_bar_yscale(height: f64) -> LinearScale {
    LinearScale::new((0.0, 0.0), (height, 0.0))
}

/// Arc generators of the donut chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonutArcs {
    pub radius: f64,
    pub slice: Arc,
    /// Radius labels are projected from before being pushed sideways.
    pub outer: Arc,
}

impl DonutArcs {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            slice: Arc::new(radius - 100.0, radius - 20.0),
            outer: Arc::new(radius * 0.9, radius * 0.9),
        }
    }

    /// Horizontal offset of labels on the right side.
    pub fn label_offset(&self) -> f64 {
        self.radius * 0.95
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Color;

    #[test]
    fn builders_are_idempotent() {
        let config = Config::default();
        let a = Encodings::new(&config).unwrap();
        let b = Encodings::new(&config).unwrap();
        assert_eq!(a.migration, b.migration);
        assert_eq!(a.projection, b.projection);
        assert_eq!(a.bar_x, b.bar_x);
        assert_eq!(a.bar_y, b.bar_y);
        assert_eq!(a.donut, b.donut);
    }

    #[test]
    fn migration_scale_endpoints() {
        let scale = build_migration_scale(&Config::default()).unwrap();
        assert_eq!(scale.map(-1000.0), Color(255, 0, 0));
        assert_eq!(scale.map(1000.0), Color(0, 128, 0));
        assert_eq!(scale.map(-2500.0), Color(255, 0, 0));
    }

    #[test]
    fn region_scale_by_index() {
        let mut scale = build_region_scale(&Config::default()).unwrap();
        assert_eq!(scale.map(0), Color(0x8d, 0xd3, 0xc7));
        assert_eq!(scale.map(8), Color(0xff, 0xff, 0xb3));
        assert_eq!(scale.map(1), Color(0xbe, 0xba, 0xda));
    }

    #[test]
    fn bar_scales() {
        let y = build_bar_yscale(360.0);
        assert_eq!(y.range(), (360.0, 0.0));
        assert_eq!(y.domain(), (0.0, 0.0));
        assert!(build_bar_xscale(500.0).domain().is_empty());
    }

    #[test]
    fn donut_radii() {
        let arcs = DonutArcs::new(150.0);
        assert_eq!(arcs.slice, Arc::new(50.0, 130.0));
        assert_eq!(arcs.outer, Arc::new(135.0, 135.0));
        assert_eq!(arcs.label_offset(), 142.5);
    }
}
