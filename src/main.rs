use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use costlens::auth::{self, AuthStorage};
use costlens::banner::{BannerInfo, print_banner, print_session_summary};
use costlens::commands::{CommandContext, CommandRegistry, CommandResult};
use costlens::config::{Config, ConfigKey, Overrides, Settings};
use costlens::consts::default_db_path;
use costlens::ingest;
use costlens::llm::{self, Provider};
use costlens::logging;
use costlens::session::Session;

#[derive(Parser)]
#[command(
    name = "costlens",
    version,
    about = "Cost tracking dashboard with model-driven forecasts."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// LLM provider: groq or anthropic
    #[arg(short, long, global = true)]
    provider: Option<Provider>,

    /// Model name (provider-specific)
    #[arg(long, global = true)]
    model: Option<String>,

    /// SQLite database for config and credentials (default ~/.costlens/costlens.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Forecast horizon passed to the model, e.g. "6 mois"
    #[arg(long, global = true)]
    horizon: Option<String>,

    /// CSV or Excel file to load instead of the sample dataset
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive dashboard (default)
    Repl,
    /// Print the data tables, forecast and anomaly report
    Report,
    /// Print KPIs and the cost chart
    Dashboard,
    /// Print cost composition, trends and unit cost distribution
    Analytics,
    /// Ask the model for a cost forecast
    Forecast,
    /// Ask the model to flag unusual cost patterns
    Anomalies,
    /// Ask the model to explain cost trends against budget variance
    Explain {
        /// Observed cost trends
        #[arg(long)]
        trends: String,
        /// Budget variance
        #[arg(long)]
        variance: String,
    },
    /// Store an API key for a provider (read from stdin)
    Login {
        /// Provider to store the key for
        provider: Provider,
    },
    /// Remove the stored API key for a provider
    Logout {
        /// Provider to log out from
        provider: Provider,
    },
    /// Read or change persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show one key, or every key when none is given
    Get { key: Option<ConfigKey> },
    /// Persist a value
    Set { key: ConfigKey, value: String },
    /// Remove a persisted value
    Unset { key: ConfigKey },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let db_path = resolve_db_path(cli.db.as_deref())?;
    debug!(db = %db_path, "using database");

    let command = cli.command.unwrap_or(Command::Repl);
    match command {
        Command::Login { provider } => return handle_login(&db_path, provider),
        Command::Logout { provider } => {
            auth::logout(&db_path, provider)?;
            println!("✓ Logged out from {provider}.");
            return Ok(());
        }
        Command::Config { action } => return handle_config(&db_path, action),
        _ => {}
    }

    let config = Config::open(&db_path)?;
    let settings = Settings::resolve(
        &config,
        Overrides {
            provider: cli.provider,
            model: cli.model,
            horizon: cli.horizon,
        },
    )?;

    let auth = AuthStorage::open(&db_path)?;
    let auth_status = auth.key_source(settings.provider)?.label();
    let model = llm::build(settings.provider, settings.model.clone(), auth);

    let mut session = match &cli.data {
        Some(path) => {
            let records = ingest::load_file(path)?;
            Session::with_records(records)
        }
        None => Session::with_sample(),
    };
    let dataset = match &cli.data {
        Some(path) => format!("{} ({} records)", path.display(), session.records().len()),
        None => format!("sample ({} records)", session.records().len()),
    };

    let registry = CommandRegistry::new();
    let mut ctx = CommandContext {
        session: &mut session,
        model: model.as_ref(),
        settings: &settings,
        auth_status,
        db_path: &db_path,
    };

    let one_shot = match command {
        Command::Report => Some(("/report", String::new())),
        Command::Dashboard => Some(("/dashboard", String::new())),
        Command::Analytics => Some(("/analytics", String::new())),
        Command::Forecast => Some(("/forecast", String::new())),
        Command::Anomalies => Some(("/anomalies", String::new())),
        Command::Explain { trends, variance } => Some(("/explain", format!("{trends} | {variance}"))),
        _ => None,
    };
    if let Some((name, args)) = one_shot {
        info!(command = name, "running one-shot command");
        registry.run(name, &args, &mut ctx).await?;
        return Ok(());
    }

    print_banner(&BannerInfo {
        provider: settings.provider.as_str(),
        model: settings.model_name(),
        auth_status,
        dataset: &dataset,
        horizon: &settings.horizon,
    });

    // REPL: async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\ncostlens> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {e}");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        // Ctrl+C during a model call cancels the call, not the REPL
        tokio::select! {
            result = registry.dispatch(input, &mut ctx) => {
                match result {
                    CommandResult::Quit => break,
                    CommandResult::NotACommand => {
                        println!("not a command: {input}");
                        println!("type /help for available commands");
                    }
                    CommandResult::Handled => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted");
            }
        }
    }

    print_session_summary(ctx.session.usage());
    Ok(())
}

/// Pick the database path and make sure its directory exists.
fn resolve_db_path(flag: Option<&Path>) -> Result<String> {
    let path = match flag {
        Some(p) => p.to_path_buf(),
        None => default_db_path()?,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    path.to_str()
        .map(str::to_string)
        .context("database path is not valid UTF-8")
}

fn handle_login(db_path: &str, provider: Provider) -> Result<()> {
    print!("Paste your {provider} API key: ");
    io::stdout().flush()?;
    let mut key = String::new();
    io::stdin()
        .lock()
        .read_line(&mut key)
        .context("failed to read API key")?;

    auth::login(db_path, provider, &key)?;
    println!("✓ Saved API key for {provider}.");
    Ok(())
}

fn handle_config(db_path: &str, action: ConfigAction) -> Result<()> {
    let config = Config::open(db_path)?;
    match action {
        ConfigAction::Get { key: Some(key) } => match config.get(key.as_str())? {
            Some(value) => println!("{value}"),
            None => println!("{key} is not set"),
        },
        ConfigAction::Get { key: None } => {
            for key in ConfigKey::ALL {
                let value = config.get(key.as_str())?;
                println!("{key:<10} {}", value.as_deref().unwrap_or("(default)"));
            }
        }
        ConfigAction::Set { key, value } => {
            key.validate(&value)?;
            config.set(key.as_str(), value.trim())?;
            println!("✓ {key} = {}", value.trim());
        }
        ConfigAction::Unset { key } => {
            config.remove(key.as_str())?;
            println!("✓ {key} reset to default");
        }
    }
    Ok(())
}
