use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::render;
use crate::session::Session;

pub struct ReportCommand;

/// Historical table, forecast table and the last anomaly report.
pub(crate) fn report_view(session: &Session) -> String {
    let mut out = String::from("Historical data\n");
    out.push_str(&render::records_table(session.records()));
    out.push_str("\n\nForecast\n");
    out.push_str(&render::forecast_table(session.forecast()));
    out.push('\n');
    if !session.anomaly_report().is_empty() {
        out.push_str(&format!("\nAnomaly report\n{}\n", session.anomaly_report()));
    }
    if !session.decision_support().is_empty() {
        out.push_str(&format!("\nDecision support\n{}\n", session.decision_support()));
    }
    out
}

#[async_trait]
impl Command for ReportCommand {
    fn name(&self) -> &str {
        "/report"
    }

    fn aliases(&self) -> &[&str] {
        &["/r"]
    }

    fn description(&self) -> &str {
        "show data tables, forecast and anomaly report"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        print!("{}", report_view(ctx.session));
        Ok(CommandResult::Handled)
    }
}
