use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::spinner::Spinner;

pub struct ExplainCommand;

/// `"costs rose | 5% over budget"` -> `("costs rose", "5% over budget")`.
fn split_inputs(args: &str) -> Result<(&str, &str)> {
    let (trends, variance) = args
        .split_once('|')
        .context("usage: /explain <cost trends> | <budget variance>")?;
    let (trends, variance) = (trends.trim(), variance.trim());
    if trends.is_empty() || variance.is_empty() {
        bail!("both cost trends and budget variance are required");
    }
    Ok((trends, variance))
}

#[async_trait]
impl Command for ExplainCommand {
    fn name(&self) -> &str {
        "/explain"
    }

    fn usage(&self) -> &str {
        "<trends> | <variance>"
    }

    fn description(&self) -> &str {
        "ask the model to explain cost trends against budget variance"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let (trends, variance) = split_inputs(args)?;
        let outcome =
            Spinner::during("explaining", ctx.session.explain_with(ctx.model, trends, variance)).await?;
        println!("{}", outcome.explanation);
        Ok(CommandResult::Handled)
    }
}
