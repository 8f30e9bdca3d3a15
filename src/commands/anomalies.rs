use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult, require_data};
use crate::spinner::Spinner;

pub struct AnomaliesCommand;

#[async_trait]
impl Command for AnomaliesCommand {
    fn name(&self) -> &str {
        "/anomalies"
    }

    fn description(&self) -> &str {
        "ask the model to flag unusual cost patterns"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        require_data(ctx.session)?;
        let outcome =
            Spinner::during("detecting anomalies", ctx.session.detect_anomalies_with(ctx.model)).await?;
        println!("Anomaly report\n{}", outcome.report);
        if !outcome.decision_support.is_empty() {
            println!("\nDecision support\n{}", outcome.decision_support);
        }
        Ok(CommandResult::Handled)
    }
}
