//! Built-in REPL commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry handles dispatch, alias resolution,
//! and dynamic help generation. The one-shot CLI subcommands run the same
//! commands through [`CommandRegistry::run`].

mod analytics;
mod anomalies;
mod dashboard;
mod explain;
mod export;
mod forecast;
mod help;
mod load;
mod quit;
mod report;
mod sample;
mod tokens;
mod whoami;

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::LanguageModel;
use crate::session::Session;

/// Everything a command may read or change while it runs.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub model: &'a dyn LanguageModel,
    pub settings: &'a Settings,
    pub auth_status: &'a str,
    pub db_path: &'a str,
}

/// What the REPL should do after a command runs.
#[derive(Debug)]
pub enum CommandResult {
    /// Not a command. The REPL prints a hint.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Exit the REPL.
    Quit,
}

/// A REPL command. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/forecast"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/h", "/?"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Argument synopsis shown by `/help`, e.g. `"[horizon]"`.
    fn usage(&self) -> &str {
        ""
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command with everything after its name as `args`.
    async fn execute(&self, args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult>;
}

/// Holds registered commands.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(load::LoadCommand),
            Arc::new(sample::SampleCommand),
            Arc::new(dashboard::DashboardCommand),
            Arc::new(report::ReportCommand),
            Arc::new(analytics::AnalyticsCommand),
            Arc::new(forecast::ForecastCommand),
            Arc::new(anomalies::AnomaliesCommand),
            Arc::new(explain::ExplainCommand),
            Arc::new(export::ExportCommand),
            Arc::new(tokens::TokensCommand),
            Arc::new(whoami::WhoamiCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    /// Register an additional command.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    fn find(&self, trigger: &str) -> Option<&Arc<dyn Command>> {
        self.commands
            .iter()
            .find(|c| trigger == c.name() || c.aliases().contains(&trigger))
    }

    /// Dispatch REPL input. Errors are printed here and never end the loop.
    pub async fn dispatch(&self, input: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
        let input = input.trim();
        let (trigger, args) = split_command(input);

        let Some(command) = self.find(trigger) else {
            if input.starts_with('/') {
                println!("unknown command: {trigger}");
                println!("type /help for available commands");
                return CommandResult::Handled;
            }
            return CommandResult::NotACommand;
        };

        // /help is special: it needs the registry to list all commands
        if command.name() == "/help" {
            print!("{}", self.help_text());
            return CommandResult::Handled;
        }

        match command.execute(args, ctx).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("  ✗ {e:#}");
                CommandResult::Handled
            }
        }
    }

    /// Run a command by name and propagate its error. Used by the one-shot
    /// subcommands so a failure becomes a non-zero exit status.
    pub async fn run(
        &self,
        name: &str,
        args: &str,
        ctx: &mut CommandContext<'_>,
    ) -> Result<CommandResult> {
        match self.find(name) {
            Some(command) => command.execute(args, ctx).await,
            None => bail!("unknown command: {name}"),
        }
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.usage(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    /// All registered command names.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// All registered names and aliases (for duplicate detection).
    pub fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `"/forecast 12 mois"` -> `("/forecast", "12 mois")`.
fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((trigger, args)) => (trigger, args.trim()),
        None => (input, ""),
    }
}

fn format_label(name: &str, usage: &str, aliases: &[&str]) -> String {
    let mut label = name.to_string();
    if !usage.is_empty() {
        label.push(' ');
        label.push_str(usage);
    }
    if !aliases.is_empty() {
        label.push_str(&format!(" ({})", aliases.join(", ")));
    }
    label
}

/// Fail early with a hint instead of sending an empty dataset to the model.
fn require_data(session: &Session) -> Result<()> {
    if session.records().is_empty() {
        bail!("no historical data loaded (use /load <file> or /sample)");
    }
    Ok(())
}
