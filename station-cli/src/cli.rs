use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};

use anyhow::Context;
use chrono::Local;
use clap::{ArgAction, Parser};
use log::info;
use station_core::{
    Config, LinePrompt, Prompt, RecordStore, Session, SessionSummary, report, session::STOP,
};

use crate::terminal::InquirePrompt;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-station",
    version,
    about = "Record daily weather observations and print a sorted report"
)]
pub struct Cli {
    /// JSON file holding the observations [default: data/weather.json].
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Read settings from this TOML file instead of the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    pub fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let path = config.resolve_data_file(self.data_file.as_deref());
        info!("Using data file {}", path.display());

        let mut store = RecordStore::load(&path).context("Cannot start without a usable data file")?;

        println!("[Weather Station]");
        println!(" \nNOTE: Type '{STOP}' to end the program.");

        let today = Local::now().date_naive();
        let summary = if io::stdin().is_terminal() {
            collect(InquirePrompt, &mut store, today)?
        } else {
            collect(LinePrompt::new(io::stdin().lock(), io::stdout()), &mut store, today)?
        };
        info!("Recorded {} entries, discarded {}", summary.committed, summary.discarded);

        println!("\nSaving to file...");
        store
            .save(&path)
            .with_context(|| format!("Observations were NOT saved to {}", path.display()))?;

        println!("\n{}", report::REPORT_HEADER);
        for line in report::render(&store).context("Data file contains an invalid date key")? {
            println!("{line}");
        }

        Ok(())
    }
}

fn collect<P: Prompt>(
    prompt: P,
    store: &mut RecordStore,
    today: chrono::NaiveDate,
) -> anyhow::Result<SessionSummary> {
    Session::new(prompt, store, today)
        .run()
        .context("Failed to read input")
}
