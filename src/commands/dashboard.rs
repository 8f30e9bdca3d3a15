use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::render;
use crate::session::Session;

pub struct DashboardCommand;

/// KPI cards, the cost chart and the last forecast's notes.
pub(crate) fn dashboard_view(session: &Session) -> String {
    let mut out = render::kpi_panel(&session.metrics());
    out.push('\n');
    let chart = session.chart();
    if chart.is_empty() {
        out.push_str("  no data to chart\n");
    } else {
        out.push_str("\nCost trend\n");
        out.push_str(&render::cost_chart(&chart));
    }
    if !session.summary().is_empty() {
        out.push_str(&format!("\nForecast analysis\n  {}\n", session.summary()));
    }
    if !session.warning().is_empty() {
        out.push_str(&format!("\n⚠ Overrun warning\n  {}\n", session.warning()));
    }
    out
}

#[async_trait]
impl Command for DashboardCommand {
    fn name(&self) -> &str {
        "/dashboard"
    }

    fn aliases(&self) -> &[&str] {
        &["/d"]
    }

    fn description(&self) -> &str {
        "show KPIs and the cost chart"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        print!("{}", dashboard_view(ctx.session));
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_has_kpis_and_chart() {
        let view = dashboard_view(&Session::with_sample());
        assert!(view.contains("Total Cost (Current)"));
        assert!(view.contains("Cost trend"));
        assert!(!view.contains("Overrun warning"));
    }

    #[test]
    fn empty_session_has_no_chart() {
        let view = dashboard_view(&Session::default());
        assert!(view.contains("no data to chart"));
    }
}
