//! Round trips against the model: build the prompt, call, parse the reply.

pub mod anomaly;
pub mod explain;
pub mod forecast;
pub mod table;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::llm::extract_json;

pub use anomaly::{AnomalyOutcome, run_anomaly_detection};
pub use explain::{ExplanationOutcome, explain};
pub use forecast::{ForecastOutcome, ForecastPoint, run_forecast};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no historical data: load a .csv or .xlsx file first")]
    NoData,

    #[error("malformed model reply: {reason}")]
    MalformedReply { reason: String },
}

/// Decode the JSON object inside a model reply.
fn decode_reply<T: DeserializeOwned>(text: &str) -> Result<T, AnalysisError> {
    serde_json::from_str(extract_json(text)).map_err(|e| AnalysisError::MalformedReply {
        reason: format!("{e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn decode_reply_accepts_fenced_json() {
        let sample: Sample = decode_reply("```json\n{\"value\": 3}\n```").unwrap();
        assert_eq!(sample.value, 3);
    }

    #[test]
    fn decode_reply_reports_malformed() {
        let err = decode_reply::<Sample>("plain words").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedReply { .. }));
    }
}
