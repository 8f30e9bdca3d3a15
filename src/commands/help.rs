use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};

/// Listed in `/help`; the registry renders the text itself.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _args: &str, _ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        Ok(CommandResult::Handled)
    }
}
