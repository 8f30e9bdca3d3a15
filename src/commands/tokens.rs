use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::consts::format_number;

pub struct TokensCommand;

#[async_trait]
impl Command for TokensCommand {
    fn name(&self) -> &str {
        "/tokens"
    }

    fn description(&self) -> &str {
        "show session token usage"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let usage = ctx.session.usage();
        if usage.total() == 0 {
            println!("  no tokens used this session");
        } else {
            println!(
                "  {} input + {} output = {} total",
                format_number(usage.input_tokens),
                format_number(usage.output_tokens),
                format_number(usage.total()),
            );
        }
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;

    #[tokio::test]
    async fn returns_handled_zero() {
        let mut fx = Fixture::new(vec![]);
        assert!(matches!(
            TokensCommand.execute("", &mut fx.ctx()).await.unwrap(),
            CommandResult::Handled
        ));
    }
}
