//! Analytics views derived from the loaded records.

use chrono::Datelike;

use crate::data::CostRecord;

const MONTHS_FR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Fixed/variable split of the latest month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostComposition {
    pub fixed: f64,
    pub variable: f64,
}

impl CostComposition {
    /// Share of fixed cost in the total, between 0 and 1.
    pub fn fixed_share(&self) -> f64 {
        let total = self.fixed + self.variable;
        if total == 0.0 { 0.0 } else { self.fixed / total }
    }
}

/// Split the last record's total around an estimated fixed cost.
pub fn cost_composition(records: &[CostRecord], fixed_cost: f64) -> Option<CostComposition> {
    records.last().map(|last| CostComposition {
        fixed: fixed_cost,
        variable: last.total_cost - fixed_cost,
    })
}

/// `(volume, total cost)` pairs for the scatter view.
pub fn cost_vs_volume(records: &[CostRecord]) -> Vec<(u64, f64)> {
    records.iter().map(|r| (r.volume, r.total_cost)).collect()
}

/// French short month label, e.g. `"févr."`.
pub fn month_label(record: &CostRecord) -> &'static str {
    MONTHS_FR[record.date.month0() as usize]
}

/// Total cost over the last twelve records, labelled by month.
pub fn monthly_trends(records: &[CostRecord]) -> Vec<(&'static str, f64)> {
    let start = records.len().saturating_sub(12);
    records[start..]
        .iter()
        .map(|r| (month_label(r), r.total_cost))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

/// Equal-width histogram of unit costs between the observed min and max.
pub fn unit_cost_distribution(records: &[CostRecord], bin_count: usize) -> Vec<Bin> {
    if records.is_empty() || bin_count == 0 {
        return Vec::new();
    }
    let min = records.iter().map(|r| r.unit_cost).fold(f64::INFINITY, f64::min);
    let max = records.iter().map(|r| r.unit_cost).fold(f64::NEG_INFINITY, f64::max);
    let size = (max - min) / bin_count as f64;

    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            low: min + i as f64 * size,
            high: min + (i + 1) as f64 * size,
            count: 0,
        })
        .collect();

    for r in records {
        let idx = if size > 0.0 {
            (((r.unit_cost - min) / size).floor() as usize).min(bin_count - 1)
        } else {
            0
        };
        bins[idx].count += 1;
    }
    bins
}
