use clap::{CommandFactory, Parser};
use colored::*;
use tracing_subscriber::EnvFilter;

use restavo::cli::Args;
use restavo::repl::Repl;
use restavo::{App, Config, HttpApi};

/// Log filter variable, e.g. `RESTAVO_LOG=restavo=debug`.
const LOG_ENV: &str = "RESTAVO_LOG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "restavo", &mut std::io::stdout());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }

    let api = HttpApi::from_config(&config.api)?;
    eprintln!(
        "{}",
        format!("  Restavo client → {}", api.base_url()).bright_green()
    );

    let app = App::new(api, config.ui);
    let mut repl = Repl::new(app, std::io::stdout(), args.html_out);
    repl.run().await?;

    Ok(())
}
