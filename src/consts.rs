//! Project-wide constants.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default provider when neither the flag nor the config names one.
pub const DEFAULT_PROVIDER: &str = "groq";

/// Default Groq model.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Forecast horizon handed to the model when none is given.
pub const DEFAULT_HORIZON: &str = "6 mois";

/// Description attached to every anomaly-detection request.
pub const ANOMALY_DESCRIPTION: &str =
    "Monthly organizational costs including total cost, unit cost, and production volume.";

/// Estimated monthly fixed cost used for the cost composition split.
pub const DEFAULT_FIXED_COST: f64 = 50_000.0;

/// Currency suffix for rendered amounts (Moroccan Dirham).
pub const CURRENCY: &str = "DH";

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "COSTLENS_LOG";

/// Default database path: `~/.costlens/costlens.db`.
/// Holds config and credentials. Cost data is never written here.
pub fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".costlens").join("costlens.db"))
}

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    group_digits(&n.to_string(), ',')
}

/// Insert `sep` between groups of three digits of an unsigned digit string.
pub(crate) fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.chars().count();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(sep);
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!AUTHOR.is_empty());
        assert!(!HOMEPAGE.is_empty());
        assert!(!REPO.is_empty());
        assert!(!DEFAULT_GROQ_MODEL.is_empty());
        assert!(!DEFAULT_ANTHROPIC_MODEL.is_empty());
    }

    #[test]
    fn consts_from_cargo_toml() {
        assert!(REPO.contains("costlens"));
    }

    #[test]
    fn format_number_zero() {
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn format_number_small() {
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(123_456), "123,456");
    }

    #[test]
    fn format_number_millions() {
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn group_digits_custom_separator() {
        assert_eq!(group_digits("1234567", ' '), "1 234 567");
    }

    #[test]
    fn db_path_under_dot_dir() {
        if let Ok(path) = default_db_path() {
            assert!(path.ends_with(".costlens/costlens.db"));
        }
    }
}
