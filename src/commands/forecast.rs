use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Command, CommandContext, CommandResult, require_data};
use crate::analysis::ForecastOutcome;
use crate::render;
use crate::spinner::Spinner;

pub struct ForecastCommand;

pub(crate) fn forecast_view(outcome: &ForecastOutcome) -> String {
    let mut out = render::forecast_table(&outcome.points);
    out.push('\n');
    if !outcome.summary.is_empty() {
        out.push_str(&format!("\nForecast analysis\n  {}\n", outcome.summary));
    }
    if !outcome.warning.is_empty() {
        out.push_str(&format!("\n⚠ Overrun warning\n  {}\n", outcome.warning));
    }
    out
}

#[async_trait]
impl Command for ForecastCommand {
    fn name(&self) -> &str {
        "/forecast"
    }

    fn aliases(&self) -> &[&str] {
        &["/f"]
    }

    fn usage(&self) -> &str {
        "[horizon]"
    }

    fn description(&self) -> &str {
        "ask the model for a cost forecast (default horizon from config)"
    }

    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        require_data(ctx.session)?;
        let horizon = if args.is_empty() {
            ctx.settings.horizon.as_str()
        } else {
            args
        };
        info!(horizon, model = ctx.model.model(), "requesting forecast");
        let outcome = Spinner::during("forecasting", ctx.session.forecast_with(ctx.model, horizon)).await?;
        print!("{}", forecast_view(&outcome));
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;

    const REPLY: &str = r#"{"forecastedCosts": "\"Date\",\"Forecasted Cost\"\n\"2024-07-01\",\"120000\"\n\"2024-08-01\",\"125000\"", "analysisSummary": "hausse modérée", "overrunWarning": ""}"#;

    #[tokio::test]
    async fn stores_forecast_in_session() {
        let mut fx = Fixture::new(vec![REPLY]);
        ForecastCommand.execute("", &mut fx.ctx()).await.unwrap();
        assert_eq!(fx.session.forecast().len(), 2);
        assert_eq!(fx.session.summary(), "hausse modérée");
        assert!(fx.model.prompts()[0].user.contains("6 mois"));
    }

    #[tokio::test]
    async fn horizon_argument_wins() {
        let mut fx = Fixture::new(vec![REPLY]);
        ForecastCommand.execute("12 mois", &mut fx.ctx()).await.unwrap();
        assert!(fx.model.prompts()[0].user.contains("12 mois"));
    }

    #[tokio::test]
    async fn malformed_reply_is_an_error() {
        let mut fx = Fixture::new(vec!["not json at all"]);
        assert!(ForecastCommand.execute("", &mut fx.ctx()).await.is_err());
        assert!(fx.session.forecast().is_empty());
    }

    #[test]
    fn view_shows_warning_only_when_present() {
        let outcome = ForecastOutcome {
            points: vec![],
            summary: "ok".to_string(),
            warning: String::new(),
            usage: None,
        };
        let view = forecast_view(&outcome);
        assert!(view.contains("ok"));
        assert!(!view.contains("Overrun"));
    }
}
