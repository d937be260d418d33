use crate::geography::Point;
use std::f64::consts::{PI, TAU};

/// Angular extent of one value in a pie layout. Angles are in radians,
/// clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) / 2.0
    }

    /// Whether the slice's middle points into the right half of the circle.
    pub fn faces_right(&self) -> bool {
        self.mid_angle() < PI
    }
}

/// Lays out values as consecutive slices of a full turn, in input order.
/// Negative and NaN values get an empty slice.
pub fn pie(values: impl IntoIterator<Item = f64>) -> Vec<PieSlice> {
    let values: Vec<f64> = values.into_iter().collect();
    let total: f64 = values.iter().map(|&v| weight(v)).sum();
    let k = if total > 0.0 { TAU / total } else { 0.0 };

    let mut angle = 0.0;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let start_angle = angle;
            angle += weight(value) * k;
            PieSlice {
                index,
                value,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

fn weight(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

/// Annular sector generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Arc {
    pub fn new(inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
        }
    }

    pub fn centroid(&self, slice: &PieSlice) -> Point {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        polar(r, slice.mid_angle())
    }

    /// Outline of the sector: the outer arc clockwise, then the inner arc back.
    pub fn outline(&self, slice: &PieSlice) -> Vec<Point> {
        let sweep = slice.end_angle - slice.start_angle;
        // About one vertex per degree.
        let segments = ((sweep / PI * 180.0).ceil() as usize).max(1);
        let angle = |i: usize| slice.start_angle + sweep * i as f64 / segments as f64;

        let mut points: Vec<Point> = (0..=segments)
            .map(|i| polar(self.outer_radius, angle(i)))
            .collect();
        if self.inner_radius > 0.0 {
            points.extend((0..=segments).rev().map(|i| polar(self.inner_radius, angle(i))));
        } else {
            points.push((0.0, 0.0));
        }
        points
    }

    /// Whether `point` lies inside the sector of `slice`.
    pub fn contains(&self, slice: &PieSlice, (x, y): Point) -> bool {
        let r = x.hypot(y);
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        let angle = x.atan2(-y).rem_euclid(TAU);
        angle >= slice.start_angle && angle < slice.end_angle
    }
}

fn polar(r: f64, angle: f64) -> Point {
    (r * angle.sin(), -r * angle.cos())
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn pie_angles() {
        let slices = pie([1.0, 3.0]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start_angle, 0.0);
        assert!(close(slices[0].end_angle, PI / 2.0));
        assert!(close(slices[1].start_angle, PI / 2.0));
        assert!(close(slices[1].end_angle, TAU));
        assert!(close(slices[0].mid_angle(), PI / 4.0));
    }

    #[test]
    fn pie_ignores_non_positive() {
        let slices = pie([2.0, -5.0, f64::NAN, 2.0]);
        assert!(close(slices[0].end_angle, PI));
        assert_eq!(slices[1].start_angle, slices[1].end_angle);
        assert_eq!(slices[2].start_angle, slices[2].end_angle);
        assert!(close(slices[3].end_angle, TAU));
    }

    #[test]
    fn pie_of_zeros() {
        let slices = pie([0.0, 0.0]);
        assert!(slices.iter().all(|s| s.start_angle == 0.0 && s.end_angle == 0.0));
        assert!(pie(std::iter::empty()).is_empty());
    }

    #[test]
    fn faces_right_split() {
        let slice = |start, end| PieSlice {
            index: 0,
            value: 1.0,
            start_angle: start,
            end_angle: end,
        };
        assert!(slice(0.0, 0.0).faces_right());
        assert!(slice(0.0, PI - 0.2).faces_right());
        assert!(!slice(PI - 0.1, PI + 0.5).faces_right());
        assert!(!slice(PI, TAU).faces_right());
    }

    #[test]
    fn centroid_at_mid_radius() {
        let arc = Arc::new(50.0, 100.0);
        let slice = PieSlice {
            index: 0,
            value: 1.0,
            start_angle: 0.0,
            end_angle: PI,
        };
        // Mid-angle is three o'clock.
        let (x, y) = arc.centroid(&slice);
        assert!(close(x, 75.0));
        assert!(close(y, 0.0));
    }

    #[test]
    fn outline_and_contains() {
        let arc = Arc::new(50.0, 100.0);
        let slice = PieSlice {
            index: 0,
            value: 1.0,
            start_angle: 0.0,
            end_angle: PI / 2.0,
        };
        let outline = arc.outline(&slice);
        assert_eq!(outline.len(), 2 * 91);
        assert!(close(outline[0].0, 0.0) && close(outline[0].1, -100.0));

        assert!(arc.contains(&slice, (50.0, -50.0)));
        assert!(!arc.contains(&slice, (10.0, -10.0)));
        assert!(!arc.contains(&slice, (-50.0, -50.0)));
        assert!(!arc.contains(&slice, (50.0, 50.0)));
    }
}
