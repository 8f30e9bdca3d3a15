use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Map;
use tracing::{info, warn};

use super::table::{TableRow, Value, parse_csv_table};
use super::{AnalysisError, decode_reply};
use crate::data::{CostRecord, to_csv};
use crate::ingest::dates::parse_date_text;
use crate::ingest::headers::canonical;
use crate::ingest::numbers::parse_float_prefix;
use crate::llm::{LanguageModel, TokenUsage};
use crate::prompts::forecast::build_forecast_prompt;

const DATE_KEYS: &[&str] = &["date", "mois", "month"];
const COST_KEYS: &[&str] = &[
    "forecastedcost",
    "forecastcost",
    "forecast",
    "coûtprévu",
    "coutprevu",
    "prévision",
    "prevision",
    "cost",
    "montant",
];

/// One forecasted month. The date is kept as the model wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: String,
    pub forecasted_cost: f64,
}

impl ForecastPoint {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date_text(&self.date)
    }
}

/// Everything a forecast run hands back to the session.
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub points: Vec<ForecastPoint>,
    pub summary: String,
    pub warning: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastReply {
    forecasted_costs: ForecastTable,
    #[serde(default)]
    analysis_summary: String,
    #[serde(default)]
    overrun_warning: String,
}

/// Models are asked for a CSV string but sometimes return rows as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum ForecastTable {
    Csv(String),
    Rows(Vec<Map<String, serde_json::Value>>),
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Number(n) => n.to_string(),
    }
}

fn cost_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => parse_float_prefix(s),
    }
}

/// Where a row's columns came from. Object keys have no meaningful order.
#[derive(Clone, Copy)]
enum Layout {
    Ordered,
    Keyed,
}

/// The cost column when no header names it: a numeric column other than
/// the date. Ordered rows fall back to the first parseable text value.
fn unnamed_cost(row: &TableRow, date_col: usize, layout: Layout) -> Option<f64> {
    let mut numbers = row.others(date_col).filter_map(|(_, v)| match v {
        Value::Number(n) => Some(*n),
        Value::Text(_) => None,
    });
    let first = numbers.next();
    match layout {
        // Only unambiguous when a single numeric value is present.
        Layout::Keyed => first.filter(|_| numbers.next().is_none()),
        Layout::Ordered => first.or_else(|| row.others(date_col).find_map(|(_, v)| cost_of(v))),
    }
}

fn point_from_row(row: &TableRow, layout: Layout) -> Option<ForecastPoint> {
    let date_col = match (row.position(DATE_KEYS), layout) {
        (Some(col), _) => col,
        (None, Layout::Ordered) => 0,
        (None, Layout::Keyed) => return None,
    };
    let date = row.at(date_col).map(text_of)?;
    if date.is_empty() {
        return None;
    }
    let cost = match row.position(COST_KEYS).filter(|col| *col != date_col) {
        Some(col) => row.at(col).and_then(cost_of)?,
        None => unnamed_cost(row, date_col, layout)?,
    };
    Some(ForecastPoint {
        date,
        forecasted_cost: cost,
    })
}

/// Parse the `forecastedCosts` CSV into points, skipping unusable rows.
pub fn parse_forecast(text: &str) -> Vec<ForecastPoint> {
    parse_csv_table(text)
        .iter()
        .filter_map(|row| point_from_row(row, Layout::Ordered))
        .collect()
}

fn points_from_objects(rows: &[Map<String, serde_json::Value>]) -> Vec<ForecastPoint> {
    rows.iter()
        .filter_map(|obj| {
            let row = TableRow(
                obj.iter()
                    .map(|(k, v)| {
                        let value = match v {
                            serde_json::Value::Number(n) => {
                                n.as_f64().map_or_else(|| Value::Text(n.to_string()), Value::Number)
                            }
                            serde_json::Value::String(s) => Value::Text(s.trim().to_string()),
                            other => Value::Text(other.to_string()),
                        };
                        (k.clone(), value)
                    })
                    .collect(),
            );
            point_from_row(&row, Layout::Keyed)
        })
        .collect()
}

/// Ask the model for a forecast over `horizon` and parse its table.
pub async fn run_forecast(
    model: &dyn LanguageModel,
    records: &[CostRecord],
    horizon: &str,
) -> Result<ForecastOutcome> {
    if records.is_empty() {
        return Err(AnalysisError::NoData.into());
    }

    let prompt = build_forecast_prompt(&to_csv(records), horizon);
    let completion = model.complete(&prompt).await?;
    let reply: ForecastReply = decode_reply(&completion.text)?;

    let points = match &reply.forecasted_costs {
        ForecastTable::Csv(csv) => parse_forecast(csv),
        ForecastTable::Rows(rows) => points_from_objects(rows),
    };
    if points.is_empty() {
        warn!(raw = %completion.text, "forecast reply had no usable rows");
        return Err(AnalysisError::MalformedReply {
            reason: "forecastedCosts contained no forecast rows".to_string(),
        }
        .into());
    }

    info!(
        provider = model.provider(),
        points = points.len(),
        horizon,
        "forecast generated"
    );

    Ok(ForecastOutcome {
        points,
        summary: reply.analysis_summary,
        warning: reply.overrun_warning,
        usage: completion.usage,
    })
}
