use crate::color::Color;
use crate::config::ChartSize;
use crate::encoding::Encodings;
use crate::geography::{Region, label_position};
use crate::scene::{Anchor, Chart, Element, Hook, Paint, Role, Shape};
use crate::schema::MigrationRecord;
use log::debug;

pub const TITLE: &str = "Net Migration of Australian States";

const DIMMED: f64 = 0.4;
const MARKER_OPACITY: f64 = 0.4;

/// Static layer of the map: one shape and one label per region, and the title.
///
/// Regions are colored by their position in `regions`, so colors are only
/// stable as long as the feature order of the geography is.
pub fn draw_regions(regions: &[Region], encodings: &mut Encodings, size: ChartSize) -> Vec<Element> {
    let outlines: Vec<_> = regions
        .iter()
        .map(|region| region.project(&encodings.projection))
        .collect();

    let mut elements = Vec::with_capacity(2 * regions.len() + 1);
    for (i, (region, outline)) in regions.iter().zip(&outlines).enumerate() {
        elements.push(
            Element::new(
                Role::Region,
                Shape::Polygon(outline.clone()),
                Paint::fill(encodings.region_colors.map(i)).with_stroke(Color::DIM_GRAY),
            )
            .with_hook(Hook::SelectRegion(region.name.clone())),
        );
    }
    for (region, outline) in regions.iter().zip(&outlines) {
        let Some(at) = label_position(outline) else {
            debug!("No label for {}: empty outline", region.name);
            continue;
        };
        elements.push(
            Element::new(
                Role::RegionLabel,
                Shape::Text {
                    at,
                    content: region.name.clone(),
                    anchor: Anchor::Middle,
                    size: 12.0,
                    vertical: false,
                },
                Paint::fill(Color::DARK_SLATE_GRAY),
            )
            .with_hook(Hook::SelectRegion(region.name.clone())),
        );
    }
    elements.push(title(TITLE, (size.width / 2.0 + 150.0, 70.0)));
    elements
}

pub fn marker_radius(net_migration: f64) -> f64 {
    net_migration.abs() / 500.0 + 25.0
}

/// One translucent circle per row, at the row's projected position.
pub fn draw_markers(rows: &[MigrationRecord], encodings: &Encodings) -> Vec<Element> {
    rows.iter()
        .map(|row| {
            Element::new(
                Role::Marker,
                Shape::Circle {
                    center: encodings.projection.project((row.longitude, row.latitude)),
                    radius: marker_radius(row.net_migration),
                },
                Paint::fill(encodings.migration.map(row.net_migration))
                    .with_stroke_width(3.0)
                    .with_opacity(MARKER_OPACITY),
            )
            .with_title(format!("Net Migration: {}", row.net_migration))
        })
        .collect()
}

/// Shows `selected` at full opacity and dims every other region.
pub fn highlight(chart: &mut Chart, selected: &str) {
    chart.set_opacity(Role::Region, |element| match &element.hook {
        Some(Hook::SelectRegion(name)) if name == selected => 1.0,
        _ => DIMMED,
    });
}

pub(crate) fn title(content: &str, at: (f64, f64)) -> Element {
    Element::new(
        Role::Title,
        Shape::Text {
            at,
            content: content.into(),
            anchor: Anchor::Middle,
            size: 18.0,
            vertical: false,
        },
        Paint::fill(Color::BLACK),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use geo::{LineString, MultiPolygon, Polygon};

    fn outline(points: &[(f64, f64)]) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(LineString::from(points.to_vec()), vec![])])
    }

    fn regions() -> Vec<Region> {
        vec![
            Region::new(
                "Western Australia",
                outline(&[(115.0, -35.0), (129.0, -35.0), (129.0, -14.0), (115.0, -20.0)]),
            ),
            Region::new(
                "Victoria",
                outline(&[(141.0, -39.0), (150.0, -38.0), (149.0, -36.0), (141.0, -34.0)]),
            ),
        ]
    }

    #[test]
    fn regions_labels_and_title() {
        let config = Config::default();
        let mut encodings = Encodings::new(&config).unwrap();
        let elements = draw_regions(&regions(), &mut encodings, config.map_inner());
        let count = |role: Role| elements.iter().filter(|e| e.role == role).count();
        assert_eq!(count(Role::Region), 2);
        assert_eq!(count(Role::RegionLabel), 2);
        assert_eq!(count(Role::Title), 1);

        assert_eq!(elements[0].paint.fill, Some(Color(0x8d, 0xd3, 0xc7)));
        assert_eq!(elements[1].paint.fill, Some(Color(0xff, 0xff, 0xb3)));
        assert_eq!(elements[1].paint.stroke, Some(Color::DIM_GRAY));
        // The label is as clickable as the shape.
        assert_eq!(elements[3].hook, elements[1].hook);
    }

    #[test]
    fn marker_encoding() {
        let config = Config::default();
        let encodings = Encodings::new(&config).unwrap();
        let markers = draw_markers(
            &[MigrationRecord {
                state: "Victoria".into(),
                longitude: 125.0,
                latitude: -30.0,
                net_migration: -1000.0,
            }],
            &encodings,
        );
        assert_eq!(markers.len(), 1);
        let Shape::Circle { center, radius } = markers[0].shape else {
            panic!("Expected a circle");
        };
        assert_eq!(radius, 27.0);
        assert!((center.0 - 725.0).abs() < 1e-9 && (center.1 - 480.0).abs() < 1e-9);
        assert_eq!(markers[0].paint.fill, Some(Color(255, 0, 0)));
        assert_eq!(markers[0].paint.opacity, 0.4);
        assert_eq!(markers[0].title.as_deref(), Some("Net Migration: -1000"));
    }

    #[test]
    fn marker_radius_is_symmetric() {
        assert_eq!(marker_radius(0.0), 25.0);
        assert_eq!(marker_radius(2500.0), 30.0);
        assert_eq!(marker_radius(-2500.0), 30.0);
    }

    #[test]
    fn highlight_dims_others() {
        let config = Config::default();
        let mut encodings = Encodings::new(&config).unwrap();
        let mut chart = Chart::new(config.map_inner(), (0.0, 0.0));
        chart.set_base(draw_regions(&regions(), &mut encodings, config.map_inner()));

        highlight(&mut chart, "Victoria");
        let opacities: Vec<f64> = chart
            .base()
            .iter()
            .filter(|e| e.role == Role::Region)
            .map(|e| e.paint.opacity)
            .collect();
        assert_eq!(opacities, vec![0.4, 1.0]);

        highlight(&mut chart, "Western Australia");
        assert_eq!(chart.base()[0].paint.opacity, 1.0);
        assert_eq!(chart.base()[1].paint.opacity, 0.4);
    }
}
