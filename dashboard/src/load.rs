use crate::config::{Config, Dataset, IndustryDataset, YearStamp};
use crate::geography::{Region, parse_regions};
use crate::schema::{Record, parse_rows};
use anyhow::{Context, Result};
use log::{debug, trace};
use std::fmt::{self, Display};

/// Position of the year slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearSelection {
    index: u32,
    base_year: u32,
}

impl YearSelection {
    /// Clamps `index` to the slider bounds.
    pub fn new(config: &Config, index: u32) -> Self {
        Self {
            index: index.min(config.max_year_index),
            base_year: config.base_year,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn year(&self) -> u32 {
        self.base_year + self.index
    }
}

/// Path of the per-year file of a dataset, or `None` when the dataset has no
/// file name to build.
pub fn resolve_filename(dataset: &Dataset, year: YearSelection) -> Option<String> {
    if dataset.prefix.is_empty() {
        return None;
    }
    let stamp = match dataset.stamp {
        YearStamp::Calendar => year.year(),
        YearStamp::Index => year.index(),
    };
    Some(format!("{}{}{stamp}.csv", dataset.folder, dataset.prefix))
}

/// Like [`resolve_filename`], except that years before the floor have no
/// industry data and always read the fallback file.
pub fn industry_filename(industry: &IndustryDataset, year: YearSelection) -> Option<String> {
    if year.index() < industry.floor_index {
        if industry.fallback.is_empty() {
            return None;
        }
        return Some(format!("{}{}", industry.dataset.folder, industry.fallback));
    }
    resolve_filename(&industry.dataset, year)
}

/// Somewhere files can be read from, by path.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn fetch(&self, path: &str) -> Result<String>;
}

/// Reads files below a local directory.
#[cfg(not(target_arch = "wasm32"))]
pub struct FsSource {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FsSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl DataSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        trace!("Reading {}", full.display());
        tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("Failed to read {}", full.display()))
    }
}

/// Fetches files relative to a base URL.
pub struct HttpSource {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        let base = reqwest::Url::parse(base).with_context(|| format!("Invalid base URL: {base}"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }
}

impl DataSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self
            .base
            .join(path)
            .with_context(|| format!("Invalid path: {path}"))?;
        trace!("Fetching {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Why a load attempt produced nothing.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be retrieved.
    Fetch { path: String, source: anyhow::Error },
    /// The file was retrieved but does not hold the expected data.
    Parse { path: String, source: anyhow::Error },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Fetch { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch { path, source } => write!(f, "Failed to fetch {path}: {source:#}"),
            LoadError::Parse { path, source } => write!(f, "Failed to parse {path}: {source:#}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch { source, .. } | LoadError::Parse { source, .. } => Some(&**source),
        }
    }
}

/// Retrieves the text of one file.
pub async fn fetch(source: &impl DataSource, path: &str) -> Result<String, LoadError> {
    source.fetch(path).await.map_err(|e| LoadError::Fetch {
        path: path.to_owned(),
        source: e,
    })
}

/// Parses the text fetched for `path`, all rows or nothing.
pub fn parse_loaded<T: Record>(path: &str, text: &str) -> Result<Vec<T>, LoadError> {
    let rows = parse_rows(text).map_err(|e| LoadError::Parse {
        path: path.to_owned(),
        source: e,
    })?;
    debug!("Parsed {} rows from {path}", rows.len());
    Ok(rows)
}

pub async fn load_geography(
    source: &impl DataSource,
    path: &str,
) -> Result<Vec<Region>, LoadError> {
    let text = fetch(source, path).await?;
    parse_regions(&text).map_err(|e| LoadError::Parse {
        path: path.to_owned(),
        source: e,
    })
}
