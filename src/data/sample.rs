//! Deterministic demo dataset loaded into a fresh session.

use std::f64::consts::PI;

use chrono::NaiveDate;

use super::CostRecord;

const SEED: u64 = 12_345;
const MONTHS: u32 = 24;
const BASE_FIXED_COST: f64 = 50_000.0;
const BASE_VARIABLE_COST_PER_UNIT: f64 = 75.0;

/// Linear congruential generator yielding values in `[0, 1)`.
struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> f64 {
        self.state = (self.state * 9_301 + 49_297) % 233_280;
        self.state as f64 / 233_280.0
    }
}

/// Twenty-four monthly records ending June 2024.
pub fn historical_costs() -> Vec<CostRecord> {
    let mut random = SeededRandom::new(SEED);
    let end = 2024 * 12 + 5; // June 2024, zero-based month index

    (0..MONTHS)
        .rev()
        .filter_map(|i| {
            let index = end - i as i32;
            let month0 = index.rem_euclid(12) as u32;
            let date = NaiveDate::from_ymd_opt(index.div_euclid(12), month0 + 1, 1)?;

            let seasonal = 1.0 + 0.2 * (month0 as f64 / 12.0 * 2.0 * PI).sin();
            let trend = 1.0 + i as f64 * 0.005;
            let volume = 1_000.0 * seasonal * trend + random.next() * 100.0 - 50.0;

            let variable_per_unit = BASE_VARIABLE_COST_PER_UNIT + (random.next() - 0.5) * 5.0;
            let fixed = BASE_FIXED_COST + (random.next() - 0.5) * 2_000.0;

            let total = fixed + volume * variable_per_unit;
            let unit = total / volume;

            Some(CostRecord {
                date,
                total_cost: total.round(),
                unit_cost: (unit * 100.0).round() / 100.0,
                volume: volume.round() as u64,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn generates_two_years_of_months() {
        let data = historical_costs();
        assert_eq!(data.len(), 24);
        assert_eq!(data[0].date, NaiveDate::from_ymd_opt(2022, 7, 1).unwrap());
        assert_eq!(data[23].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        for pair in data.windows(2) {
            assert!(pair[0].date < pair[1].date);
            assert_eq!(pair[1].date.day(), 1);
        }
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(historical_costs(), historical_costs());
    }

    #[test]
    fn values_are_plausible() {
        for r in historical_costs() {
            assert!(r.volume > 700 && r.volume < 1_400, "volume {}", r.volume);
            assert!(r.unit_cost > 100.0 && r.unit_cost < 160.0, "unit {}", r.unit_cost);
            assert_eq!(r.total_cost, r.total_cost.round());
        }
    }

    #[test]
    fn random_stays_in_unit_interval() {
        let mut rng = SeededRandom::new(SEED);
        for _ in 0..1_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
