//! CLI entrypoint for mixture-of-solvers
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use mos_application::{MosCoordinator, NoProgress, ProgressNotifier};
use mos_domain::{ConfigIssue, Query};
use mos_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, SourceRegistry};
use mos_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting mixture-of-solvers");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_overrides(&mut config, &cli);

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(text) = cli.query.as_deref() else {
        bail!("A query is required. Run with --help for usage.");
    };

    check_issues(&config.validate())?;

    // === Dependency Injection ===
    let registry = SourceRegistry::from_config(&config)?;
    let roster = registry.roster(&config.roles)?;
    let mut coordinator = MosCoordinator::from_config(&config.to_mos_config(), roster)?;

    let transcript = cli
        .transcript
        .clone()
        .or_else(|| config.logging.transcript_path());
    if let Some(path) = transcript {
        let opened = if config.logging.append {
            JsonlConversationLogger::append(&path)
        } else {
            JsonlConversationLogger::create(&path)
        };
        match opened {
            Ok(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                coordinator = coordinator.with_logger(Arc::new(logger));
            }
            // A bad transcript path never stops a run
            Err(e) => warn!("Could not open transcript {}: {}", path.display(), e),
        }
    }

    let mut query = Query::new(text).context("Invalid query")?;
    if let Some(lang) = &cli.lang {
        query = query.with_lang(lang.as_str());
    }
    if let Some(units) = &cli.units {
        query = query.with_units(units.as_str());
    }

    // Execute with the progress display that fits the terminal session
    let progress: Box<dyn ProgressNotifier> = if cli.quiet || !config.output.show_progress {
        Box::new(NoProgress)
    } else if cli.verbose > 0 {
        // Log lines would tear progress bars apart
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let report = coordinator
        .answer_with_progress(&query, progress.as_ref())
        .await?;

    // Output results
    ConsoleFormatter::set_color(config.output.color);
    let format = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter::render(&report, format).trim_end());

    Ok(())
}

/// Command-line flags win over every config file
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(strategy) = cli.strategy {
        config.mos.strategy = strategy.to_string();
    }
    if let Some(rounds) = cli.rounds {
        config.mos.discussion_rounds = rounds;
    }
}

/// Log warnings; refuse to run when any issue is an error
fn check_issues(issues: &[ConfigIssue]) -> Result<()> {
    let mut errors = Vec::new();
    for issue in issues {
        if issue.is_error() {
            errors.push(issue.message.as_str());
        } else {
            warn!("{}", issue.message);
        }
    }

    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}
