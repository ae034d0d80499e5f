//! Load the position catalog from CSV

use super::Position;
use crate::error::{StressError, StressResult};
use csv::Reader;
use std::path::Path;

/// Default catalog location, relative to the working directory
pub const DEFAULT_POSITIONS_PATH: &str = "data/positions.csv";

/// Raw CSV row matching positions.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Face")]
    face: f64,
    #[serde(rename = "Coupon")]
    coupon: f64,
    // Signed so a negative maturity surfaces as an invalid position, not a parse failure
    #[serde(rename = "Maturity")]
    maturity: i64,
    #[serde(rename = "BaseYield")]
    base_yield: f64,
}

impl CsvRow {
    fn to_position(self) -> StressResult<Position> {
        let maturity = u32::try_from(self.maturity)
            .ok()
            .filter(|&m| m >= 1)
            .ok_or_else(|| {
                StressError::invalid_position(
                    &self.name,
                    format!("maturity must be at least 1 period, got {}", self.maturity),
                )
            })?;

        let position = Position {
            name: self.name,
            face: self.face,
            coupon: self.coupon,
            maturity,
            base_yield: self.base_yield,
        };
        position.validate()?;
        Ok(position)
    }
}

/// Load all positions from a CSV file
pub fn load_positions<P: AsRef<Path>>(path: P) -> StressResult<Vec<Position>> {
    let reader = Reader::from_path(path)?;
    collect_positions(reader)
}

/// Load positions from any reader (e.g., string buffer, request body)
pub fn load_positions_from_reader<R: std::io::Read>(reader: R) -> StressResult<Vec<Position>> {
    collect_positions(Reader::from_reader(reader))
}

/// Load positions from the default data/positions.csv location
pub fn load_default_positions() -> StressResult<Vec<Position>> {
    load_positions(DEFAULT_POSITIONS_PATH)
}

fn collect_positions<R: std::io::Read>(mut reader: Reader<R>) -> StressResult<Vec<Position>> {
    let mut positions = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        positions.push(row.to_position()?);
    }

    log::debug!("Loaded {} positions", positions.len());
    Ok(positions)
}
