use anyhow::{Result, anyhow};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use serde::de::DeserializeOwned;

// Migration
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MigrationRecord {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Long")]
    pub longitude: f64,
    #[serde(rename = "Lat")]
    pub latitude: f64,
    #[serde(rename = "Net")]
    pub net_migration: f64,
}

// Housing
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HousingRecord {
    pub state: String,
    #[serde(rename = "price")]
    pub average_price: f64,
}

// Industry
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndustryRecord {
    pub state: String,
    pub industry: String,
    /// In thousands of people.
    pub employed: f64,
}

/// A row type read from one of the per-year CSV files.
pub trait Record: DeserializeOwned {
    fn validate(&self) -> Result<()>;
}

impl Record for MigrationRecord {
    fn validate(&self) -> Result<()> {
        if !(self.longitude.is_finite() && self.latitude.is_finite()) {
            return Err(anyhow!("Invalid position for {}", self.state));
        }
        if !self.net_migration.is_finite() {
            return Err(anyhow!("Invalid net migration for {}", self.state));
        }
        Ok(())
    }
}

impl Record for HousingRecord {
    fn validate(&self) -> Result<()> {
        if !(self.average_price.is_finite() && self.average_price >= 0.0) {
            return Err(anyhow!(
                "Invalid average price for {}: {}",
                self.state,
                self.average_price
            ));
        }
        Ok(())
    }
}

impl Record for IndustryRecord {
    fn validate(&self) -> Result<()> {
        if !(self.employed.is_finite() && self.employed >= 0.0) {
            return Err(anyhow!(
                "Invalid employment for {} in {}: {}",
                self.industry,
                self.state,
                self.employed
            ));
        }
        Ok(())
    }
}

/// Parses every row of a CSV document with a header line. A single bad row
/// rejects the whole document.
pub fn parse_rows<T: Record>(text: &str) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, row)| -> Result<T> {
            let row = row.map_err(|e| anyhow!("Row {}: {e}", i + 1))?;
            row.validate().map_err(|e| anyhow!("Row {}: {e}", i + 1))?;
            Ok(row)
        })
        .collect()
}
