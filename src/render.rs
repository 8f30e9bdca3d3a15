//! Terminal rendering: tables, KPI cards and text charts.
//!
//! Amounts follow the `fr-FR` convention (space thousands, comma
//! decimals) with a Dirham suffix.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::analysis::ForecastPoint;
use crate::analytics::{Bin, CostComposition};
use crate::consts::{CURRENCY, group_digits};
use crate::data::CostRecord;
use crate::metrics::{Change, ChartPoint, DashboardMetrics};

const BAR_WIDTH: usize = 40;
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// `1234567.891, 2` -> `"1 234 567,89"`.
pub fn format_fr(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, ' '));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Whole-unit amount with currency, e.g. `"123 456 DH"`.
pub fn format_currency(value: f64) -> String {
    format!("{} {CURRENCY}", format_fr(value, 0))
}

/// Amount with cents, for unit costs.
pub fn format_currency_cents(value: f64) -> String {
    format!("{} {CURRENCY}", format_fr(value, 2))
}

pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string(), ' ')
}

fn styled<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Total Cost")]
    total: String,
    #[tabled(rename = "Unit Cost")]
    unit: String,
    #[tabled(rename = "Volume")]
    volume: String,
}

/// All records, newest first.
pub fn records_table(records: &[CostRecord]) -> String {
    if records.is_empty() {
        return "no historical data loaded".to_string();
    }
    styled(records.iter().rev().map(|r| RecordRow {
        date: r.date.format("%Y-%m-%d").to_string(),
        total: format_currency(r.total_cost),
        unit: format_currency_cents(r.unit_cost),
        volume: format_count(r.volume),
    }))
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Forecasted Cost")]
    cost: String,
}

pub fn forecast_table(points: &[ForecastPoint]) -> String {
    if points.is_empty() {
        return "no forecast yet (run /forecast)".to_string();
    }
    styled(points.iter().map(|p| ForecastRow {
        date: p.date.clone(),
        cost: format_currency(p.forecasted_cost),
    }))
}

#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "KPI")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "vs last month")]
    change: String,
}

fn change_cell(change: Change, increase_is_good: bool) -> String {
    let flag = if change.percent > 0.0 && change.direction.is_bad(increase_is_good) {
        " !"
    } else {
        ""
    };
    format!("{} {}{flag}", change.direction.arrow(), change.label())
}

/// The four dashboard cards as a table. `!` marks unfavourable moves.
pub fn kpi_panel(m: &DashboardMetrics) -> String {
    let forecast = if m.has_forecast() {
        format_currency(m.next_month_forecast)
    } else {
        "N/A".to_string()
    };
    let forecast_note = if m.has_forecast() {
        format!("next month / {} total", format_currency(m.total_forecast_cost))
    } else {
        "run /forecast to see".to_string()
    };
    styled([
        KpiRow {
            name: "Total Cost (Current)",
            value: format_currency(m.total_cost),
            change: change_cell(m.cost_change, false),
        },
        KpiRow {
            name: "Avg. Unit Cost",
            value: format_currency_cents(m.unit_cost),
            change: change_cell(m.unit_cost_change, false),
        },
        KpiRow {
            name: "Production Volume",
            value: format_count(m.volume),
            change: change_cell(m.volume_change, true),
        },
        KpiRow {
            name: "Cost Forecast",
            value: forecast,
            change: forecast_note,
        },
    ])
}

/// Horizontal bars scaled to the largest value.
pub fn bar_chart(items: &[(String, f64)]) -> String {
    let label_width = items.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = items.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (label, value) in items {
        let len = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round().max(0.0) as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {label:<label_width$}  {bar:<BAR_WIDTH$}  {v}\n",
            bar = "█".repeat(len),
            v = format_fr(*value, 0),
        ));
    }
    out
}

/// One block character per value, scaled between min and max.
pub fn sparkline(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= 0.0 {
                SPARKS[SPARKS.len() / 2]
            } else {
                let idx = ((v - min) / span * (SPARKS.len() - 1) as f64).round() as usize;
                SPARKS[idx.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}

/// Actual (`█`) and forecasted (`░`) cost per date.
pub fn cost_chart(series: &[ChartPoint]) -> String {
    let max = series
        .iter()
        .flat_map(|p| [p.actual, p.forecasted])
        .flatten()
        .fold(0.0_f64, f64::max);
    let scale = |v: f64| {
        if max > 0.0 {
            ((v / max) * BAR_WIDTH as f64).round().max(0.0) as usize
        } else {
            0
        }
    };
    let date_width = series.iter().map(|p| p.date.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for p in series {
        let (bar, value) = match (p.actual, p.forecasted) {
            (Some(a), Some(f)) => (
                format!("{}{}", "█".repeat(scale(a)), "░".repeat(scale(f).saturating_sub(scale(a)))),
                format!("{} / {}", format_fr(a, 0), format_fr(f, 0)),
            ),
            (Some(a), None) => ("█".repeat(scale(a)), format_fr(a, 0)),
            (None, Some(f)) => ("░".repeat(scale(f)), format_fr(f, 0)),
            (None, None) => (String::new(), String::new()),
        };
        out.push_str(&format!(
            "  {date:<date_width$}  {bar:<BAR_WIDTH$}  {value}\n",
            date = p.date
        ));
    }
    out.push_str("  █ actual  ░ forecast\n");
    out
}

pub fn composition_chart(c: &CostComposition) -> String {
    let share = c.fixed_share();
    let mut out = bar_chart(&[
        ("Fixed costs".to_string(), c.fixed),
        ("Variable costs".to_string(), c.variable),
    ]);
    out.push_str(&format!(
        "  fixed {:.0}% / variable {:.0}%\n",
        share * 100.0,
        (1.0 - share) * 100.0
    ));
    out
}

pub fn histogram(bins: &[Bin]) -> String {
    let items: Vec<(String, f64)> = bins
        .iter()
        .map(|b| {
            (
                format!("{} - {}", format_currency(b.low), format_currency(b.high)),
                b.count as f64,
            )
        })
        .collect();
    bar_chart(&items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn format_fr_groups_and_uses_comma() {
        assert_eq!(format_fr(1_234_567.891, 2), "1 234 567,89");
        assert_eq!(format_fr(999.0, 0), "999");
        assert_eq!(format_fr(1000.4, 0), "1 000");
        assert_eq!(format_fr(-1500.0, 0), "-1 500");
        assert_eq!(format_fr(-0.001, 0), "0");
    }

    #[test]
    fn currency_suffix() {
        assert_eq!(format_currency(123_456.6), "123 457 DH");
        assert_eq!(format_currency_cents(98.5), "98,50 DH");
    }

    #[test]
    fn records_table_is_newest_first() {
        let records = [
            CostRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1.0, 1.0, 1),
            CostRecord::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 2.0, 1.0, 1),
        ];
        let table = records_table(&records);
        let jan = table.find("2024-01-01").unwrap();
        let feb = table.find("2024-02-01").unwrap();
        assert!(feb < jan);
        assert!(table.contains("Total Cost"));
    }

    #[test]
    fn empty_tables_have_messages() {
        assert!(records_table(&[]).contains("no historical data"));
        assert!(forecast_table(&[]).contains("/forecast"));
    }

    #[test]
    fn kpi_panel_without_forecast() {
        let m = DashboardMetrics::compute(&[], &[]);
        let panel = kpi_panel(&m);
        assert!(panel.contains("N/A"));
        assert!(panel.contains("Production Volume"));
    }

    #[test]
    fn bar_chart_scales_to_max() {
        let chart = bar_chart(&[("a".to_string(), 10.0), ("b".to_string(), 5.0)]);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn sparkline_spans_range() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
        assert_eq!(sparkline(&[4.0, 4.0]).chars().count(), 2);
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn cost_chart_has_legend() {
        let series = [ChartPoint {
            date: "2024-01-01".to_string(),
            actual: None,
            forecasted: Some(3.0),
        }];
        let chart = cost_chart(&series);
        assert!(chart.contains('░'));
        assert!(chart.contains("actual"));
    }
}
