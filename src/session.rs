//! In-memory dashboard state for one run. Nothing here is persisted.

use anyhow::Result;

use crate::analysis::{self, AnomalyOutcome, ExplanationOutcome, ForecastOutcome, ForecastPoint};
use crate::data::{CostRecord, sample};
use crate::llm::{LanguageModel, TokenUsage};
use crate::metrics::{self, ChartPoint, DashboardMetrics};

#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<CostRecord>,
    forecast: Vec<ForecastPoint>,
    summary: String,
    warning: String,
    anomaly_report: String,
    decision_support: String,
    usage: TokenUsage,
}

impl Session {
    /// A session preloaded with the demo dataset.
    pub fn with_sample() -> Self {
        Self::with_records(sample::historical_costs())
    }

    pub fn with_records(records: Vec<CostRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[CostRecord] {
        &self.records
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn warning(&self) -> &str {
        &self.warning
    }

    pub fn anomaly_report(&self) -> &str {
        &self.anomaly_report
    }

    pub fn decision_support(&self) -> &str {
        &self.decision_support
    }

    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    /// Swap the dataset. Every model-derived result is cleared with it.
    pub fn replace_data(&mut self, records: Vec<CostRecord>) {
        self.records = records;
        self.forecast.clear();
        self.summary.clear();
        self.warning.clear();
        self.anomaly_report.clear();
        self.decision_support.clear();
    }

    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics::compute(&self.records, &self.forecast)
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        metrics::chart_series(&self.records, &self.forecast)
    }

    fn record_usage(&mut self, usage: Option<TokenUsage>) {
        if let Some(u) = usage {
            self.usage.add(u);
        }
    }

    /// Run a forecast and keep its result. On error the state is untouched.
    pub async fn forecast_with(
        &mut self,
        model: &dyn LanguageModel,
        horizon: &str,
    ) -> Result<ForecastOutcome> {
        let outcome = analysis::run_forecast(model, &self.records, horizon).await?;
        self.record_usage(outcome.usage);
        self.forecast = outcome.points.clone();
        self.summary = outcome.summary.clone();
        self.warning = outcome.warning.clone();
        Ok(outcome)
    }

    /// Run anomaly detection and keep the report. On error the state is untouched.
    pub async fn detect_anomalies_with(&mut self, model: &dyn LanguageModel) -> Result<AnomalyOutcome> {
        let outcome = analysis::run_anomaly_detection(model, &self.records).await?;
        self.record_usage(outcome.usage);
        self.anomaly_report = outcome.report.clone();
        self.decision_support = outcome.decision_support.clone();
        Ok(outcome)
    }

    pub async fn explain_with(
        &mut self,
        model: &dyn LanguageModel,
        cost_trends: &str,
        budget_variance: &str,
    ) -> Result<ExplanationOutcome> {
        let outcome = analysis::explain(model, cost_trends, budget_variance).await?;
        self.record_usage(outcome.usage);
        Ok(outcome)
    }
}
