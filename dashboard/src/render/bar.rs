use super::map::title;
use crate::color::Color;
use crate::encoding::Encodings;
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Element, Paint, Role, Shape};
use crate::schema::HousingRecord;

pub const TITLE: &str = "Average Housing Per State";

const TICK_SIZE: f64 = 6.0;
const TICK_COUNT: usize = 10;
/// Horizontal shift of the bars and of the value axis.
const SHIFT: f64 = 3.0;

/// Everything a housing load produces, committed together.
#[derive(Debug, Clone)]
pub struct BarFrame {
    pub elements: Vec<Element>,
    pub x: BandScale,
    pub y: LinearScale,
}

/// Bars, both axes and the title for one housing dataset.
///
/// The category domain follows the dataset order and the value domain is
/// `[0, max(price)]`. Bars are colored by row position.
pub fn draw_bars(rows: &[HousingRecord], encodings: &mut Encodings) -> BarFrame {
    let x = encodings
        .bar_x
        .with_domain(rows.iter().map(|row| row.state.as_str()));
    let max = rows
        .iter()
        .map(|row| row.average_price)
        .fold(0.0, f64::max);
    let y = encodings.bar_y.with_domain((0.0, max));
    let height = y.range().0;
    let width = x.range().1;

    let mut elements = Vec::with_capacity(3 * rows.len() + 2 * TICK_COUNT + 3);
    for (i, row) in rows.iter().enumerate() {
        let Some(left) = x.position(&row.state) else {
            continue;
        };
        let top = y.map(row.average_price);
        elements.push(
            Element::new(
                Role::Bar,
                Shape::Rect {
                    x: left + SHIFT,
                    y: top,
                    width: x.bandwidth(),
                    height: height - top,
                },
                Paint::fill(encodings.region_colors.map(i)),
            )
            .with_title(format!("Average Price: ${}", row.average_price)),
        );
    }

    // Category axis along the bottom, labels turned to read upwards.
    elements.push(axis_line(vec![
        (0.0, height + TICK_SIZE),
        (0.0, height),
        (width, height),
        (width, height + TICK_SIZE),
    ]));
    let half_band = x.bandwidth() / 2.0;
    for category in x.domain() {
        let Some(left) = x.position(category) else {
            continue;
        };
        let center = left + half_band;
        elements.push(axis_line(vec![(center, height), (center, height + TICK_SIZE)]));
        elements.push(axis_label(
            category.clone(),
            (center - 5.0, height - 75.0),
            Anchor::Middle,
            true,
        ));
    }

    // Value axis on the left.
    elements.push(axis_line(vec![
        (SHIFT - TICK_SIZE, height),
        (SHIFT, height),
        (SHIFT, 0.0),
        (SHIFT - TICK_SIZE, 0.0),
    ]));
    for tick in y.ticks(TICK_COUNT) {
        let at = y.map(tick);
        elements.push(axis_line(vec![(SHIFT - TICK_SIZE, at), (SHIFT, at)]));
        // plotters rotates text in quarter turns only, so these stay level.
        elements.push(axis_label(
            LinearScale::tick_label(tick),
            (SHIFT - 9.0, at),
            Anchor::End,
            false,
        ));
    }

    elements.push(title(TITLE, (width / 2.0, 12.0)));

    BarFrame { elements, x, y }
}

fn axis_line(points: Vec<(f64, f64)>) -> Element {
    Element::new(Role::Axis, Shape::Polyline(points), Paint::stroke(Color::BLACK))
}

fn axis_label(content: String, at: (f64, f64), anchor: Anchor, vertical: bool) -> Element {
    Element::new(
        Role::AxisLabel,
        Shape::Text {
            at,
            content,
            anchor,
            size: 10.0,
            vertical,
        },
        Paint::fill(Color::BLACK),
    )
}
