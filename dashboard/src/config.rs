use crate::color::Color;
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Static configuration of the dashboard.
///
/// Every field has a default matching the published page, so a configuration
/// file only needs to list the values it overrides.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_year: u32,
    pub max_year_index: u32,
    pub initial_year_index: u32,
    pub margin: Margin,
    pub map: ChartSize,
    pub bar: ChartSize,
    pub donut: ChartSize,
    pub geography: String,
    pub migration: Dataset,
    pub housing: Dataset,
    pub industry: IndustryDataset,
    pub projection: ProjectionConfig,
    pub palettes: Palettes,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_year: 2000,
            max_year_index: 19,
            initial_year_index: 19,
            margin: Margin {
                top: 10.0,
                right: 20.0,
                bottom: 30.0,
                left: 30.0,
            },
            map: ChartSize {
                width: 1500.0,
                height: 1000.0,
            },
            bar: ChartSize {
                width: 550.0,
                height: 400.0,
            },
            donut: ChartSize {
                width: 800.0,
                height: 500.0,
            },
            geography: "Json/Australia.json".into(),
            migration: Dataset {
                folder: "../data/MigrationData/".into(),
                prefix: "migration_".into(),
                stamp: YearStamp::Calendar,
            },
            housing: Dataset {
                folder: "../data/HousingPriceData/".into(),
                prefix: "housingprice_".into(),
                stamp: YearStamp::Calendar,
            },
            industry: IndustryDataset {
                dataset: Dataset {
                    folder: "../data/IndustryData/".into(),
                    prefix: "industry_".into(),
                    stamp: YearStamp::Index,
                },
                floor_index: 19,
                fallback: "industry_19.csv".into(),
            },
            projection: ProjectionConfig {
                center: (125.0, -30.0),
                scale: 1000.0,
            },
            palettes: Palettes::default(),
        }
    }
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open configuration: {}", path.display()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid configuration: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants that serde alone cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.initial_year_index > self.max_year_index {
            anyhow::bail!(
                "Initial year index {} is above the slider maximum {}",
                self.initial_year_index,
                self.max_year_index
            );
        }
        for size in [&self.map, &self.bar, &self.donut] {
            let inner = size.inner(&self.margin);
            if inner.width <= 0.0 || inner.height <= 0.0 {
                anyhow::bail!("Chart size {size:?} leaves no room inside the margins");
            }
        }
        self.palettes.region_colors()?;
        self.palettes.industry_colors()?;
        self.palettes.migration_colors()?;
        Ok(())
    }

    pub fn map_inner(&self) -> ChartSize {
        self.map.inner(&self.margin)
    }

    pub fn bar_inner(&self) -> ChartSize {
        self.bar.inner(&self.margin)
    }

    pub fn donut_inner(&self) -> ChartSize {
        self.donut.inner(&self.margin)
    }

    pub fn donut_radius(&self) -> f64 {
        let inner = self.donut_inner();
        inner.width.min(inner.height) / 3.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Pixel extent of a chart.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl ChartSize {
    pub fn inner(&self, margin: &Margin) -> ChartSize {
        ChartSize {
            width: self.width - margin.left - margin.right,
            height: self.height - margin.top - margin.bottom,
        }
    }
}

/// How the year appears in a per-year file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearStamp {
    /// `base_year + index`, e.g. `migration_2019.csv`.
    Calendar,
    /// The raw slider index, e.g. `industry_19.csv`.
    Index,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    pub folder: String,
    pub prefix: String,
    pub stamp: YearStamp,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndustryDataset {
    pub dataset: Dataset,
    /// No industry data exists before this slider index.
    pub floor_index: u32,
    pub fallback: String,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Longitude and latitude, in degrees, placed at the centre of the map.
    pub center: (f64, f64),
    pub scale: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palettes {
    pub regions: Vec<String>,
    pub industries: Vec<String>,
    pub migration_low: String,
    pub migration_high: String,
}

impl Default for Palettes {
    fn default() -> Self {
        Self {
            regions: [
                "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69",
                "#fccde5", "#d9d9d9",
            ]
            .map(String::from)
            .to_vec(),
            // Category20.
            industries: [
                "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728",
                "#ff9896", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2",
                "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
            ]
            .map(String::from)
            .to_vec(),
            migration_low: "red".into(),
            migration_high: "green".into(),
        }
    }
}

impl Palettes {
    pub fn region_colors(&self) -> Result<Vec<Color>> {
        parse_palette("regions", &self.regions)
    }

    pub fn industry_colors(&self) -> Result<Vec<Color>> {
        parse_palette("industries", &self.industries)
    }

    pub fn migration_colors(&self) -> Result<(Color, Color)> {
        Ok((
            Color::parse(&self.migration_low)?,
            Color::parse(&self.migration_high)?,
        ))
    }
}

fn parse_palette(name: &str, colors: &[String]) -> Result<Vec<Color>> {
    if colors.is_empty() {
        anyhow::bail!("Palette {name} is empty");
    }
    colors
        .iter()
        .map(|c| Color::parse(c).with_context(|| format!("Invalid color in palette {name}")))
        .collect()
}
