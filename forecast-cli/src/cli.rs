use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, Outcome, Session};
use inquire::Text;
use tracing_subscriber::EnvFilter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "forecast",
    version,
    about = "Hourly forecast extremes for a place, from Nominatim and the NWS or local files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read TARGET/WEATHER/queries/REVERSE lines and print the results (default).
    Run {
        /// Read the command lines from a file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Set the contact sent to Nominatim and the NWS in the User-Agent.
    Configure,
}

/// Logs go to stderr; stdout carries only the result lines.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run { input: None }) {
            Command::Run { input } => {
                let config = Config::load()?;
                let session = read_session(input.as_deref())?;
                tracing::debug!(?session, "parsed command input");

                let outcome = forecast_core::run(&session, &config).await;
                write_outcome(&outcome, &mut io::stdout().lock())?;
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn read_session(input: Option<&Path>) -> anyhow::Result<Session> {
    let session = match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open command input: {}", path.display()))?;
            Session::read_from(BufReader::new(file))
        }
        None => Session::read_from(io::stdin().lock()),
    };
    session.context("Invalid command input")
}

fn write_outcome(outcome: &Outcome, out: &mut impl Write) -> io::Result<()> {
    for line in outcome.lines() {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let contact = Text::new("Contact e-mail or URL for the User-Agent header:")
        .with_initial_value(config.contact.as_deref().unwrap_or_default())
        .with_help_message("Nominatim and api.weather.gov ask clients to identify themselves")
        .prompt()?;

    config.set_contact(contact);
    config.save()?;

    println!(
        "Saved {} (User-Agent: {})",
        Config::config_file_path()?.display(),
        config.user_agent()
    );
    Ok(())
}
