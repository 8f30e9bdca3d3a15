use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use super::decode_reply;
use crate::llm::{LanguageModel, TokenUsage};
use crate::prompts::explain::build_explain_prompt;

#[derive(Debug, Clone)]
pub struct ExplanationOutcome {
    pub explanation: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ExplainReply {
    explanation: String,
}

/// Decision-support explanation for a trend and a budget variance.
pub async fn explain(
    model: &dyn LanguageModel,
    cost_trends: &str,
    budget_variance: &str,
) -> Result<ExplanationOutcome> {
    let prompt = build_explain_prompt(cost_trends, budget_variance);
    let completion = model.complete(&prompt).await?;

    let explanation = match decode_reply::<ExplainReply>(&completion.text) {
        Ok(reply) => reply.explanation,
        Err(e) => {
            warn!(error = %e, "explanation reply was not JSON, keeping raw text");
            completion.text.trim().to_string()
        }
    };

    Ok(ExplanationOutcome {
        explanation,
        usage: completion.usage,
    })
}
