use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult, require_data};
use crate::data;

pub struct ExportCommand;

#[async_trait]
impl Command for ExportCommand {
    fn name(&self) -> &str {
        "/export"
    }

    fn usage(&self) -> &str {
        "<file>"
    }

    fn description(&self) -> &str {
        "write the current dataset to a CSV file"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let path = args.trim_matches(|c| c == '"' || c == '\'');
        if path.is_empty() {
            bail!("usage: /export <file>");
        }
        require_data(ctx.session)?;
        let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
        data::write_csv(ctx.session.records(), BufWriter::new(file))?;
        println!("  ✓ wrote {} records to {path}", ctx.session.records().len());
        Ok(CommandResult::Handled)
    }
}
