//! Retained description of what each chart currently shows.
//!
//! Renderers produce lists of [`Element`]s; a [`Chart`] swaps a whole list in
//! at once, so a chart never shows a mix of two loads.

use crate::color::Color;
use crate::config::ChartSize;
use crate::geography::{Point, outline_contains};
use geo::MultiPolygon;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Map,
    Bar,
    Donut,
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Map => "map",
            ChartKind::Bar => "bar",
            ChartKind::Donut => "donut",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Region,
    RegionLabel,
    Marker,
    Bar,
    Axis,
    AxisLabel,
    Slice,
    Connector,
    SliceLabel,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled outline with its holes left open.
    Polygon(MultiPolygon<f64>),
    Circle {
        center: Point,
        radius: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polyline(Vec<Point>),
    /// Text vertically centred on `at`. Vertical text reads bottom to top.
    Text {
        at: Point,
        content: String,
        anchor: Anchor,
        size: f64,
        vertical: bool,
    },
}

impl Shape {
    /// Whether a point in chart coordinates falls on the shape.
    pub fn contains(&self, (x, y): Point) -> bool {
        match self {
            Shape::Polygon(outline) => outline_contains(outline, (x, y)),
            Shape::Circle { center, radius } => {
                (x - center.0).hypot(y - center.1) <= *radius
            }
            Shape::Rect {
                x: left,
                y: top,
                width,
                height,
            } => x >= *left && x <= left + width && y >= *top && y <= top + height,
            Shape::Polyline(_) => false,
            Shape::Text {
                at,
                content,
                anchor,
                size,
                vertical,
            } => {
                // Rough glyph box: text metrics are up to the backend.
                let length = 0.6 * size * content.chars().count() as f64;
                let (along, across) = if *vertical {
                    (at.1 - y, x - at.0)
                } else {
                    (x - at.0, y - at.1)
                };
                let start = match anchor {
                    Anchor::Start => 0.0,
                    Anchor::Middle => -length / 2.0,
                    Anchor::End => -length,
                };
                along >= start && along <= start + length && across.abs() <= size / 2.0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }

    pub fn stroke(color: Color) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }

    pub fn with_stroke(self, color: Color) -> Self {
        Self {
            stroke: Some(color),
            ..self
        }
    }

    pub fn with_stroke_width(self, stroke_width: f64) -> Self {
        Self {
            stroke_width,
            ..self
        }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }
}

/// What happens when the user interacts with an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hook {
    SelectRegion(String),
    FocusSlice(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub role: Role,
    pub shape: Shape,
    pub paint: Paint,
    /// Tooltip.
    pub title: Option<String>,
    pub hook: Option<Hook>,
}

impl Element {
    pub fn new(role: Role, shape: Shape, paint: Paint) -> Self {
        Self {
            role,
            shape,
            paint,
            title: None,
            hook: None,
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    pub fn with_hook(self, hook: Hook) -> Self {
        Self {
            hook: Some(hook),
            ..self
        }
    }
}

/// One chart region. Elements are in chart coordinates, which `origin`
/// offsets into pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub size: ChartSize,
    pub origin: Point,
    base: Vec<Element>,
    data: Vec<Element>,
}

impl Chart {
    pub fn new(size: ChartSize, origin: Point) -> Self {
        Self {
            size,
            origin,
            base: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Installs the static layer drawn under the data.
    pub fn set_base(&mut self, elements: Vec<Element>) {
        self.base = elements;
    }

    /// Replaces every element of the previous load.
    pub fn replace_data(&mut self, elements: Vec<Element>) {
        self.data = elements;
    }

    pub fn base(&self) -> &[Element] {
        &self.base
    }

    pub fn data(&self) -> &[Element] {
        &self.data
    }

    /// Every element, in drawing order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.base.iter().chain(self.data.iter())
    }

    pub fn count(&self, role: Role) -> usize {
        self.elements().filter(|e| e.role == role).count()
    }

    /// Topmost interactive element under a point in pixel coordinates.
    pub fn hit(&self, (x, y): Point) -> Option<&Hook> {
        let local = (x - self.origin.0, y - self.origin.1);
        self.base
            .iter()
            .chain(self.data.iter())
            .rev()
            .find_map(|e| match &e.hook {
                Some(hook) if e.shape.contains(local) => Some(hook),
                _ => None,
            })
    }

    /// Tooltip of the topmost titled element under a point in pixel
    /// coordinates.
    pub fn tooltip(&self, (x, y): Point) -> Option<&str> {
        let local = (x - self.origin.0, y - self.origin.1);
        self.base
            .iter()
            .chain(self.data.iter())
            .rev()
            .find_map(|e| match &e.title {
                Some(title) if e.shape.contains(local) => Some(title.as_str()),
                _ => None,
            })
    }

    /// Sets the opacity of every element with the given role, picking the
    /// value per element.
    pub fn set_opacity(&mut self, role: Role, mut opacity: impl FnMut(&Element) -> f64) {
        for element in self.base.iter_mut().chain(self.data.iter_mut()) {
            if element.role == role {
                let value = opacity(element);
                element.paint.opacity = value;
            }
        }
    }
}

/// The three charts of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub map: Chart,
    pub bar: Chart,
    pub donut: Chart,
}

impl Scene {
    pub fn chart(&self, kind: ChartKind) -> &Chart {
        match kind {
            ChartKind::Map => &self.map,
            ChartKind::Bar => &self.bar,
            ChartKind::Donut => &self.donut,
        }
    }

    pub fn chart_mut(&mut self, kind: ChartKind) -> &mut Chart {
        match kind {
            ChartKind::Map => &mut self.map,
            ChartKind::Bar => &mut self.bar,
            ChartKind::Donut => &mut self.donut,
        }
    }
}
