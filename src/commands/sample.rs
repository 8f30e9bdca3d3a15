use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::data::sample;

pub struct SampleCommand;

#[async_trait]
impl Command for SampleCommand {
    fn name(&self) -> &str {
        "/sample"
    }

    fn description(&self) -> &str {
        "reload the built-in demo dataset (clears results)"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let records = sample::historical_costs();
        let count = records.len();
        ctx.session.replace_data(records);
        println!("  ✓ loaded {count} sample records");
        Ok(CommandResult::Handled)
    }
}
