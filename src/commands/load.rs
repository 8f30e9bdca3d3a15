use std::path::Path;

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::ingest;

pub struct LoadCommand;

#[async_trait]
impl Command for LoadCommand {
    fn name(&self) -> &str {
        "/load"
    }

    fn usage(&self) -> &str {
        "<file>"
    }

    fn description(&self) -> &str {
        "load cost data from a CSV or Excel file (clears results)"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        let path = args.trim_matches(|c| c == '"' || c == '\'');
        if path.is_empty() {
            bail!("usage: /load <file>");
        }
        let records = ingest::load_file(Path::new(path))?;
        let count = records.len();
        ctx.session.replace_data(records);
        println!("  ✓ loaded {count} records from {path}");
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;
    use std::io::Write;

    #[tokio::test]
    async fn loads_csv_and_clears_forecast() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,total_cost,unit_cost,volume").unwrap();
        writeln!(file, "2024-01-01,1000,10,100").unwrap();
        writeln!(file, "2024-02-01,1100,11,100").unwrap();

        let mut fx = Fixture::new(vec![]);
        let path = file.path().to_str().unwrap().to_string();
        LoadCommand.execute(&path, &mut fx.ctx()).await.unwrap();
        assert_eq!(fx.session.records().len(), 2);
        assert!(fx.session.forecast().is_empty());
    }

    #[tokio::test]
    async fn missing_path_is_an_error() {
        let mut fx = Fixture::new(vec![]);
        assert!(LoadCommand.execute("", &mut fx.ctx()).await.is_err());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_data() {
        let mut fx = Fixture::new(vec![]);
        assert!(LoadCommand.execute("costs.pdf", &mut fx.ctx()).await.is_err());
        assert_eq!(fx.session.records().len(), 24);
    }
}
