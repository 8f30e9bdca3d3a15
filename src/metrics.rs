//! Dashboard KPIs and the combined actual/forecast series.

use chrono::NaiveDate;

use crate::analysis::ForecastPoint;
use crate::data::CostRecord;
use crate::ingest::dates::parse_date_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// Whether the move is unfavourable. Cost increases are bad,
    /// volume increases are good.
    pub fn is_bad(self, increase_is_good: bool) -> bool {
        (self == Direction::Increase) != increase_is_good
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Increase => "↑",
            Direction::Decrease => "↓",
        }
    }
}

/// Month-over-month change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    /// Absolute percentage.
    pub percent: f64,
    pub direction: Direction,
}

impl Change {
    pub const NONE: Change = Change {
        percent: 0.0,
        direction: Direction::Increase,
    };

    /// Percentage change from `previous` to `current`. A zero base is no change.
    pub fn between(previous: f64, current: f64) -> Self {
        if previous == 0.0 {
            return Self::NONE;
        }
        let pct = (current - previous) / previous * 100.0;
        Change {
            percent: pct.abs(),
            direction: if pct >= 0.0 {
                Direction::Increase
            } else {
                Direction::Decrease
            },
        }
    }

    /// `"4.2%"`.
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// The four KPI cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_cost: f64,
    pub cost_change: Change,
    pub unit_cost: f64,
    pub unit_cost_change: Change,
    pub volume: u64,
    pub volume_change: Change,
    pub next_month_forecast: f64,
    pub total_forecast_cost: f64,
}

impl DashboardMetrics {
    pub fn compute(records: &[CostRecord], forecast: &[ForecastPoint]) -> Self {
        let next_month_forecast = forecast.first().map_or(0.0, |p| p.forecasted_cost);
        let total_forecast_cost = forecast.iter().map(|p| p.forecasted_cost).sum();

        let Some(current) = records.last() else {
            return Self {
                total_cost: 0.0,
                cost_change: Change::NONE,
                unit_cost: 0.0,
                unit_cost_change: Change::NONE,
                volume: 0,
                volume_change: Change::NONE,
                next_month_forecast,
                total_forecast_cost,
            };
        };

        let (cost_change, unit_cost_change, volume_change) = match records.len().checked_sub(2) {
            Some(i) => {
                let prev = &records[i];
                (
                    Change::between(prev.total_cost, current.total_cost),
                    Change::between(prev.unit_cost, current.unit_cost),
                    Change::between(prev.volume as f64, current.volume as f64),
                )
            }
            None => (Change::NONE, Change::NONE, Change::NONE),
        };

        Self {
            total_cost: current.total_cost,
            cost_change,
            unit_cost: current.unit_cost,
            unit_cost_change,
            volume: current.volume,
            volume_change,
            next_month_forecast,
            total_forecast_cost,
        }
    }

    pub fn has_forecast(&self) -> bool {
        self.next_month_forecast > 0.0
    }
}

/// One x-axis position of the cost chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    pub actual: Option<f64>,
    pub forecasted: Option<f64>,
}

impl ChartPoint {
    fn sort_key(&self) -> (bool, Option<NaiveDate>) {
        let parsed = parse_date_text(&self.date);
        (parsed.is_none(), parsed)
    }
}

/// Historical costs with forecast points merged on matching dates, by date.
pub fn chart_series(records: &[CostRecord], forecast: &[ForecastPoint]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = records
        .iter()
        .map(|r| ChartPoint {
            date: r.date.format("%Y-%m-%d").to_string(),
            actual: Some(r.total_cost),
            forecasted: None,
        })
        .collect();

    if forecast.is_empty() {
        return points;
    }

    for f in forecast {
        match points.iter_mut().find(|p| p.date == f.date) {
            Some(existing) => existing.forecasted = Some(f.forecasted_cost),
            None => points.push(ChartPoint {
                date: f.date.clone(),
                actual: None,
                forecasted: Some(f.forecasted_cost),
            }),
        }
    }

    points.sort_by_cached_key(ChartPoint::sort_key);
    points
}
