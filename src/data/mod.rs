//! Cost records and their CSV rendition.

pub mod sample;

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One monthly observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Total Cost")]
    pub total_cost: f64,
    #[serde(rename = "Unit Cost")]
    pub unit_cost: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
}

impl CostRecord {
    pub fn new(date: NaiveDate, total_cost: f64, unit_cost: f64, volume: u64) -> Self {
        Self {
            date,
            total_cost,
            unit_cost,
            volume,
        }
    }
}

/// Header line of the CSV blob sent to the model.
pub const CSV_HEADER: &str = "Date,Total Cost,Unit Cost,Volume";

/// Render records as the unquoted CSV blob embedded in prompts.
pub fn to_csv(records: &[CostRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for r in records {
        lines.push(format!(
            "{},{},{},{}",
            r.date.format("%Y-%m-%d"),
            r.total_cost,
            r.unit_cost,
            r.volume
        ));
    }
    lines.join("\n")
}

/// Write records as a proper CSV file (quoted where needed).
pub fn write_csv<W: Write>(records: &[CostRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record).context("failed to serialize cost record")?;
    }
    wtr.flush().context("failed to flush CSV output")?;
    Ok(())
}
