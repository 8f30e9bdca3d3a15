use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult, require_data};
use crate::analytics;
use crate::render;
use crate::session::Session;

const HISTOGRAM_BINS: usize = 5;

pub struct AnalyticsCommand;

pub(crate) fn analytics_view(session: &Session, fixed_cost: f64) -> String {
    let records = session.records();
    let mut out = String::new();

    if let Some(composition) = analytics::cost_composition(records, fixed_cost) {
        out.push_str("Cost composition (latest month)\n");
        out.push_str(&render::composition_chart(&composition));
    }

    let mut pairs = analytics::cost_vs_volume(records);
    pairs.sort_by_key(|(volume, _)| *volume);
    let items: Vec<(String, f64)> = pairs
        .into_iter()
        .map(|(volume, cost)| (render::format_count(volume), cost))
        .collect();
    out.push_str("\nTotal cost by production volume\n");
    out.push_str(&render::bar_chart(&items));

    let trends: Vec<(String, f64)> = analytics::monthly_trends(records)
        .into_iter()
        .map(|(label, cost)| (label.to_string(), cost))
        .collect();
    let values: Vec<f64> = trends.iter().map(|(_, v)| *v).collect();
    out.push_str(&format!("\nMonthly cost trend  {}\n", render::sparkline(&values)));
    out.push_str(&render::bar_chart(&trends));

    out.push_str("\nUnit cost distribution\n");
    out.push_str(&render::histogram(&analytics::unit_cost_distribution(
        records,
        HISTOGRAM_BINS,
    )));
    out
}

#[async_trait]
impl Command for AnalyticsCommand {
    fn name(&self) -> &str {
        "/analytics"
    }

    fn aliases(&self) -> &[&str] {
        &["/a"]
    }

    fn description(&self) -> &str {
        "show cost composition, trends and unit cost distribution"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        require_data(ctx.session)?;
        print!("{}", analytics_view(ctx.session, ctx.settings.fixed_cost));
        Ok(CommandResult::Handled)
    }
}
