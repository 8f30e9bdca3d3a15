use anyhow::Result;
use serde::Deserialize;
use tracing::{info, warn};

use super::{AnalysisError, decode_reply};
use crate::consts::ANOMALY_DESCRIPTION;
use crate::data::{CostRecord, to_csv};
use crate::llm::{LanguageModel, TokenUsage};
use crate::prompts::anomaly::build_anomaly_prompt;

/// The model's narrative, shown verbatim.
#[derive(Debug, Clone)]
pub struct AnomalyOutcome {
    pub report: String,
    pub decision_support: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnomalyReply {
    anomaly_report: String,
    #[serde(default)]
    decision_support_message: String,
}

/// Ask the model to flag unusual fluctuations in the records.
///
/// A reply that is not the requested JSON object is still a usable
/// narrative, so it becomes the report as-is.
pub async fn run_anomaly_detection(
    model: &dyn LanguageModel,
    records: &[CostRecord],
) -> Result<AnomalyOutcome> {
    if records.is_empty() {
        return Err(AnalysisError::NoData.into());
    }

    let prompt = build_anomaly_prompt(&to_csv(records), ANOMALY_DESCRIPTION);
    let completion = model.complete(&prompt).await?;

    let (report, decision_support) = match decode_reply::<AnomalyReply>(&completion.text) {
        Ok(reply) => (reply.anomaly_report, reply.decision_support_message),
        Err(e) => {
            warn!(error = %e, "anomaly reply was not JSON, keeping raw text");
            (completion.text.trim().to_string(), String::new())
        }
    };

    info!(provider = model.provider(), chars = report.len(), "anomaly report received");

    Ok(AnomalyOutcome {
        report,
        decision_support,
        usage: completion.usage,
    })
}
