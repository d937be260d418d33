use crate::geography::Point;
use crate::scene::{Anchor, Chart, Element, Paint, Shape};
use anyhow::{Result, anyhow};
use geo::orient::{Direction, Orient};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FONT: &str = "sans-serif";

/// Draws every element of a chart onto a drawing area, offset by the chart
/// origin.
pub fn plot_chart<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, chart: &Chart) -> Result<()> {
    for element in chart.elements() {
        plot_element(area, chart.origin, element)
            .map_err(|e| anyhow!("Failed to draw {:?}: {e:?}", element.role))?;
    }
    Ok(())
}

/// Renders a chart alone as an SVG document.
pub fn plot_svg(chart: &Chart) -> Result<String> {
    let size = (
        chart.size.width.round() as u32,
        chart.size.height.round() as u32,
    );
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        plot_chart(&root, chart)?;
        root.present()?;
    }
    debug!("Rendered {} bytes of SVG", svg.len());
    Ok(svg)
}

fn plot_element<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    origin: Point,
    element: &Element,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let pixel = |(x, y): Point| ((origin.0 + x).round() as i32, (origin.1 + y).round() as i32);
    let paint = &element.paint;

    match &element.shape {
        Shape::Polygon(outline) => {
            for polygon in &outline.0 {
                let polygon = polygon.orient(Direction::Default);
                if let Some(style) = fill_style(paint) {
                    let points: Vec<_> = cut_holes(&polygon).into_iter().map(pixel).collect();
                    area.draw(&Polygon::new(points, style))?;
                }
                if let Some(style) = stroke_style(paint) {
                    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                        let points: Vec<_> = ring.coords().map(|c| pixel(c.x_y())).collect();
                        area.draw(&PathElement::new(points, style))?;
                    }
                }
            }
        }
        Shape::Circle { center, radius } => {
            let radius = radius.round() as i32;
            if let Some(style) = fill_style(paint) {
                area.draw(&Circle::new(pixel(*center), radius, style))?;
            }
            if let Some(style) = stroke_style(paint) {
                area.draw(&Circle::new(pixel(*center), radius, style))?;
            }
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => {
            let corners = [pixel((*x, *y)), pixel((x + width, y + height))];
            if let Some(style) = fill_style(paint) {
                area.draw(&Rectangle::new(corners, style))?;
            }
            if let Some(style) = stroke_style(paint) {
                area.draw(&Rectangle::new(corners, style))?;
            }
        }
        Shape::Polyline(points) => {
            if let Some(style) = stroke_style(paint) {
                let points: Vec<_> = points.iter().copied().map(pixel).collect();
                area.draw(&PathElement::new(points, style))?;
            }
        }
        Shape::Text {
            at,
            content,
            anchor,
            size,
            vertical,
        } => {
            let Some(fill) = paint.fill else {
                return Ok(());
            };
            let h_pos = match anchor {
                Anchor::Start => HPos::Left,
                Anchor::Middle => HPos::Center,
                Anchor::End => HPos::Right,
            };
            let mut font = FontDesc::from((FONT, *size));
            if *vertical {
                font = font.transform(FontTransform::Rotate270);
            }
            let color = rgba(fill, paint.opacity);
            let style = TextStyle::from(font)
                .color(&color)
                .pos(Pos::new(h_pos, VPos::Center));
            area.draw(&Text::new(content.as_str(), pixel(*at), style))?;
        }
    }
    Ok(())
}

/// The exterior ring followed by every hole, each hole entered from and left
/// back to the first exterior vertex. With holes wound against the exterior,
/// the bridges cancel out and the holes stay empty.
fn cut_holes(polygon: &geo::Polygon<f64>) -> Vec<Point> {
    let mut points: Vec<Point> = polygon.exterior().coords().map(|c| c.x_y()).collect();
    let Some(&start) = points.first() else {
        return points;
    };
    for hole in polygon.interiors() {
        points.extend(hole.coords().map(|c| c.x_y()));
        points.push(start);
    }
    points
}

fn rgba(color: crate::color::Color, opacity: f64) -> RGBAColor {
    RGBColor(color.0, color.1, color.2).mix(opacity)
}

fn fill_style(paint: &Paint) -> Option<ShapeStyle> {
    paint.fill.map(|fill| rgba(fill, paint.opacity).filled())
}

fn stroke_style(paint: &Paint) -> Option<ShapeStyle> {
    paint.stroke.map(|stroke| {
        rgba(stroke, paint.opacity).stroke_width(paint.stroke_width.round().max(1.0) as u32)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::encoding::Encodings;
    use crate::geography::Region;
    use crate::render::{bar, map};
    use crate::scene::{Hook, Role};
    use crate::schema::{HousingRecord, MigrationRecord};
    use geo::{LineString, MultiPolygon};

    fn outline(exterior: Vec<Point>, holes: Vec<Vec<Point>>) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![geo::Polygon::new(
            LineString::from(exterior),
            holes.into_iter().map(LineString::from).collect(),
        )])
    }

    #[test]
    fn map_to_svg() {
        let config = Config::default();
        let mut encodings = Encodings::new(&config).unwrap();
        let mut chart = Chart::new(config.map_inner(), (0.0, 0.0));
        chart.set_base(map::draw_regions(
            &[
                Region::new(
                    "Victoria",
                    outline(vec![(141.0, -39.0), (150.0, -38.0), (141.0, -34.0)], vec![]),
                ),
                Region::new(
                    "Tasmania",
                    outline(vec![(144.0, -43.5), (148.5, -43.5), (146.0, -40.5)], vec![]),
                ),
            ],
            &mut encodings,
            config.map_inner(),
        ));
        chart.replace_data(map::draw_markers(
            &[MigrationRecord {
                state: "Victoria".into(),
                longitude: 145.0,
                latitude: -37.0,
                net_migration: 400.0,
            }],
            &encodings,
        ));

        let svg = plot_svg(&chart).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 1);
        // Two region labels and the title.
        assert_eq!(svg.matches("<text").count(), 3);
        assert!(svg.contains("Tasmania"));
        assert!(svg.contains(map::TITLE));
    }

    #[test]
    fn bar_chart_to_svg() {
        let config = Config::default();
        let mut encodings = Encodings::new(&config).unwrap();
        let mut chart = Chart::new(config.bar, (config.margin.left, config.margin.top));
        let frame = bar::draw_bars(
            &[
                HousingRecord {
                    state: "Victoria".into(),
                    average_price: 500_000.0,
                },
                HousingRecord {
                    state: "Tasmania".into(),
                    average_price: 250_000.0,
                },
            ],
            &mut encodings,
        );
        let labels = frame
            .elements
            .iter()
            .filter(|e| matches!(e.shape, Shape::Text { .. }))
            .count();
        chart.replace_data(frame.elements);

        let svg = plot_svg(&chart).unwrap();
        // The background and two bars.
        assert_eq!(svg.matches("<rect").count(), 3);
        assert_eq!(svg.matches("<text").count(), labels);
    }

    #[test]
    fn redraw_does_not_accumulate() {
        let config = Config::default();
        let encodings = Encodings::new(&config).unwrap();
        let mut chart = Chart::new(config.map_inner(), (0.0, 0.0));
        let rows = [MigrationRecord {
            state: "Victoria".into(),
            longitude: 145.0,
            latitude: -37.0,
            net_migration: -10.0,
        }];
        chart.replace_data(map::draw_markers(&rows, &encodings));
        let first = plot_svg(&chart).unwrap();
        chart.replace_data(map::draw_markers(&rows, &encodings));
        assert_eq!(plot_svg(&chart).unwrap(), first);
    }

    #[test]
    fn holes_stay_empty() {
        let mut chart = Chart::new(
            crate::config::ChartSize {
                width: 20.0,
                height: 20.0,
            },
            (0.0, 0.0),
        );
        let frame = outline(
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]],
        );
        let hole = cut_holes(&frame.0[0]);
        // Closed exterior, closed hole, then back to the start.
        assert_eq!(hole.len(), 5 + 5 + 1);
        assert_eq!(hole.first(), hole.last());

        chart.set_base(vec![
            Element::new(
                Role::Region,
                Shape::Polygon(frame),
                Paint::fill(crate::color::Color(255, 0, 0)).with_stroke(crate::color::Color::BLACK),
            )
            .with_hook(Hook::SelectRegion("Frame".into())),
        ]);
        assert_eq!(chart.hit((5.0, 5.0)), None);
        assert!(chart.hit((1.0, 1.0)).is_some());

        let svg = plot_svg(&chart).unwrap();
        // One fill for the whole polygon, one outline per ring.
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("<polyline").count(), 2);
    }
}
