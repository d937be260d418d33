use crate::color::{Color, interpolate};
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::data::float::pretty_print_float;
use std::collections::HashMap;
use std::hash::Hash;

/// Continuous mapping from a numeric domain onto a numeric range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn with_domain(&self, domain: (f64, f64)) -> Self {
        Self {
            domain,
            ..self.clone()
        }
    }

    /// Position of `x` within the domain, 0 at the start and 1 at the end.
    fn normalize(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let t = if d1 == d0 { 0.0 } else { (x - d0) / (d1 - d0) };
        if self.clamp { t.clamp(0.0, 1.0) } else { t }
    }

    pub fn map(&self, x: f64) -> f64 {
        let (r0, r1) = self.range;
        r0 + (r1 - r0) * self.normalize(x)
    }

    /// Round tick values inside the domain, at most `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if d0.is_nan() || d1.is_nan() {
            return Vec::new();
        }
        RangedCoordf64::from(d0.min(d1)..d0.max(d1)).key_points(count)
    }

    /// Shortest decimal form of a tick value.
    pub fn tick_label(value: f64) -> String {
        pretty_print_float(value, false)
    }
}

/// Discrete categories laid out as equal bands over a continuous range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    pub fn new(range: (f64, f64), padding: f64) -> Self {
        Self {
            domain: Vec::new(),
            range,
            padding,
        }
    }

    /// Returns a copy of this scale over the given categories. Repeated
    /// categories keep their first position.
    pub fn with_domain<'a>(&self, categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut domain: Vec<String> = Vec::new();
        for category in categories {
            if !domain.iter().any(|c| c == category) {
                domain.push(category.to_owned());
            }
        }
        Self {
            domain,
            ..self.clone()
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        (r1 - r0) / (n - self.padding + 2.0 * self.padding).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start of the band of `category`, if the category is in the domain.
    pub fn position(&self, category: &str) -> Option<f64> {
        let index = self.domain.iter().position(|c| c == category)?;
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let step = self.step();
        // Outer padding is split evenly on both sides.
        let start = r0 + (r1 - r0 - step * (n - self.padding)) * 0.5;
        Some(start + step * index as f64)
    }
}

/// Maps discrete keys onto a palette in order of first appearance.
///
/// Like an implicit-domain ordinal scale, the mapping grows as new keys are
/// seen, so the color of a key depends on the history of lookups.
#[derive(Debug, Clone)]
pub struct OrdinalScale<K> {
    palette: Vec<Color>,
    domain: HashMap<K, usize>,
}

impl<K: Hash + Eq> OrdinalScale<K> {
    pub fn new(palette: Vec<Color>) -> Self {
        assert!(!palette.is_empty(), "palette must not be empty");
        Self {
            palette,
            domain: HashMap::new(),
        }
    }

    pub fn map(&mut self, key: K) -> Color {
        let next = self.domain.len();
        let index = *self.domain.entry(key).or_insert(next);
        self.palette[index % self.palette.len()]
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}

/// Two-ended color scale over a fixed numeric domain, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingScale {
    domain: (f64, f64),
    low: Color,
    high: Color,
}

impl DivergingScale {
    pub fn new(domain: (f64, f64), low: Color, high: Color) -> Self {
        Self { domain, low, high }
    }

    pub fn map(&self, x: f64) -> Color {
        interpolate(self.low, self.high, self.domain.0, self.domain.1, x)
    }
}
