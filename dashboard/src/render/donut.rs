use super::map::title;
use crate::color::Color;
use crate::encoding::{DonutArcs, Encodings};
use crate::geography::Point;
use crate::scene::{Anchor, Chart, Element, Hook, Paint, Role, Shape};
use crate::schema::IndustryRecord;
use crate::shape::{PieSlice, pie};
use geo::{LineString, MultiPolygon, Polygon};
use ordered_float::OrderedFloat;

pub const TITLE: &str = "Industry Breakdown of State";

const UNFOCUSED: f64 = 0.3;

/// Slices, connector lines and labels for the rows of one region.
///
/// Slices are colored by employment value, so two industries employing the
/// same number of people share a color.
pub fn draw_donut(rows: &[IndustryRecord], encodings: &mut Encodings) -> Vec<Element> {
    let arcs = encodings.donut;
    let slices = pie(rows.iter().map(|row| row.employed));

    let mut elements = Vec::with_capacity(3 * rows.len() + 1);
    for (slice, row) in slices.iter().zip(rows) {
        elements.push(
            Element::new(
                Role::Slice,
                Shape::Polygon(MultiPolygon::new(vec![Polygon::new(
                    LineString::from(arcs.slice.outline(slice)),
                    vec![],
                )])),
                Paint::fill(encodings.industry_colors.map(OrderedFloat(row.employed))),
            )
            .with_title(format!(
                "{}\nPeople Employed: {},000",
                row.industry, row.employed
            ))
            .with_hook(Hook::FocusSlice(slice.index)),
        );
    }

    elements.push(title(TITLE, (10.0, -160.0)));

    for slice in &slices {
        let (anchor_point, _) = label_position(&arcs, slice);
        elements.push(Element::new(
            Role::Connector,
            Shape::Polyline(vec![
                arcs.slice.centroid(slice),
                arcs.outer.centroid(slice),
                anchor_point,
            ]),
            Paint::stroke(Color::BLACK).with_opacity(UNFOCUSED),
        ));
    }

    for (slice, row) in slices.iter().zip(rows) {
        let (at, anchor) = label_position(&arcs, slice);
        elements.push(Element::new(
            Role::SliceLabel,
            Shape::Text {
                at,
                content: row.industry.clone(),
                anchor,
                size: 11.0,
                vertical: false,
            },
            Paint::fill(Color::BLACK),
        ));
    }

    elements
}

/// Where a slice's label goes: on the outer arc's height, pushed to the side
/// the slice faces, and anchored so the text grows away from the donut.
pub fn label_position(arcs: &DonutArcs, slice: &PieSlice) -> (Point, Anchor) {
    let (_, y) = arcs.outer.centroid(slice);
    if slice.faces_right() {
        ((arcs.label_offset(), y), Anchor::Start)
    } else {
        ((-arcs.label_offset(), y), Anchor::End)
    }
}

/// Dims every slice but `focused`; `None` restores all of them.
pub fn focus(chart: &mut Chart, focused: Option<usize>) {
    chart.set_opacity(Role::Slice, |element| match (focused, &element.hook) {
        (None, _) => 1.0,
        (Some(index), Some(Hook::FocusSlice(i))) if *i == index => 1.0,
        _ => UNFOCUSED,
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use std::f64::consts::PI;

    fn industry(rows: &[(&str, f64)]) -> Vec<IndustryRecord> {
        rows.iter()
            .map(|&(industry, employed)| IndustryRecord {
                state: "Victoria".into(),
                industry: industry.into(),
                employed,
            })
            .collect()
    }

    #[test]
    fn one_slice_line_and_label_per_row() {
        let mut encodings = Encodings::new(&Config::default()).unwrap();
        let elements = draw_donut(
            &industry(&[("Mining", 10.0), ("Retail", 30.0), ("Health", 20.0)]),
            &mut encodings,
        );
        let count = |role: Role| elements.iter().filter(|e| e.role == role).count();
        assert_eq!(count(Role::Slice), 3);
        assert_eq!(count(Role::Connector), 3);
        assert_eq!(count(Role::SliceLabel), 3);
        assert_eq!(count(Role::Title), 1);
        assert_eq!(
            elements[1].title.as_deref(),
            Some("Retail\nPeople Employed: 30,000")
        );
    }

    #[test]
    fn label_sides() {
        let arcs = DonutArcs::new(150.0);
        let slice = |start, end| PieSlice {
            index: 0,
            value: 1.0,
            start_angle: start,
            end_angle: end,
        };

        let (at, anchor) = label_position(&arcs, &slice(0.0, PI / 2.0));
        assert_eq!(anchor, Anchor::Start);
        assert_eq!(at.0, 142.5);

        let (at, anchor) = label_position(&arcs, &slice(PI, 1.5 * PI));
        assert_eq!(anchor, Anchor::End);
        assert_eq!(at.0, -142.5);

        // The split is on the mid-angle, not on where the slice starts.
        let (_, anchor) = label_position(&arcs, &slice(0.5 * PI, 1.6 * PI));
        assert_eq!(anchor, Anchor::End);
    }

    #[test]
    fn connectors_end_at_labels() {
        let mut encodings = Encodings::new(&Config::default()).unwrap();
        let elements = draw_donut(&industry(&[("A", 1.0), ("B", 3.0)]), &mut encodings);
        let lines: Vec<_> = elements
            .iter()
            .filter(|e| e.role == Role::Connector)
            .collect();
        let labels: Vec<_> = elements
            .iter()
            .filter(|e| e.role == Role::SliceLabel)
            .collect();
        for (line, label) in lines.iter().zip(&labels) {
            let Shape::Polyline(points) = &line.shape else {
                panic!("Expected a polyline");
            };
            let Shape::Text { at, .. } = &label.shape else {
                panic!("Expected a label");
            };
            assert_eq!(points.len(), 3);
            assert_eq!(points[2], *at);
        }
    }

    #[test]
    fn equal_values_share_a_color() {
        let mut encodings = Encodings::new(&Config::default()).unwrap();
        let elements = draw_donut(
            &industry(&[("A", 12.0), ("B", 12.0), ("C", 7.0)]),
            &mut encodings,
        );
        assert_eq!(elements[0].paint.fill, elements[1].paint.fill);
        assert_ne!(elements[0].paint.fill, elements[2].paint.fill);
    }

    #[test]
    fn focus_and_restore() {
        let mut encodings = Encodings::new(&Config::default()).unwrap();
        let config = Config::default();
        let mut chart = Chart::new(config.donut_inner(), (375.0, 230.0));
        chart.replace_data(draw_donut(
            &industry(&[("A", 1.0), ("B", 1.0), ("C", 2.0)]),
            &mut encodings,
        ));

        focus(&mut chart, Some(2));
        let opacities: Vec<f64> = chart
            .data()
            .iter()
            .filter(|e| e.role == Role::Slice)
            .map(|e| e.paint.opacity)
            .collect();
        assert_eq!(opacities, vec![0.3, 0.3, 1.0]);

        focus(&mut chart, None);
        assert!(
            chart
                .data()
                .iter()
                .filter(|e| e.role == Role::Slice)
                .all(|e| e.paint.opacity == 1.0)
        );
    }
}
