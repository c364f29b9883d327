use anyhow::Result;
use clap::Parser;
use tessera_cli::cli::{Cli, Commands};
use tessera_cli::commands;
use tessera_config::{ConfigOverrides, TesseraConfig};
use tessera_graph::IdentifierStrategy;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Precedence: --log-level, -v, TESSERA_LOG, logging.level
    let mut overrides = ConfigOverrides {
        log_level: cli.requested_log_level().map(str::to_string),
        ..Default::default()
    };
    match &cli.command {
        Commands::Csv { prefix, base_iri, .. } => {
            overrides.prefix = prefix.clone();
            overrides.base_iri = base_iri.clone();
        }
        Commands::Integrate {
            unified_namespace, ..
        } => overrides.unified_namespace = unified_namespace.clone(),
        _ => {}
    }
    let config = TesseraConfig::load(cli.config.clone(), overrides)?;

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();
    debug!(level = %config.logging.level, "logging initialized");

    match cli.command {
        Commands::Csv {
            input,
            schema,
            output,
            identifier,
            counter,
            ..
        } => {
            let strategy = match (identifier, counter) {
                (Some(field), _) => Some(IdentifierStrategy::Field(field)),
                (None, true) => Some(IdentifierStrategy::Counter),
                (None, false) => None,
            };
            commands::csv::execute(&config, &input, &schema, &output, strategy)?;
        }
        Commands::Convert {
            input,
            prefixes,
            output,
            format,
        } => commands::convert::execute(&input, &prefixes, &output, format)?,
        Commands::Integrate {
            output,
            count,
            args,
            ..
        } => commands::integrate::execute(&config, &output, count, &args)?,
        Commands::Query { query, graph } => commands::query::execute(&query, &graph)?,
        Commands::Request {
            endpoint,
            query,
            output,
        } => commands::request::execute(&endpoint, &query, &output)?,
        Commands::Clean { input, output } => commands::clean::execute(&input, &output)?,
    }

    Ok(())
}
