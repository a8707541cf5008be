//! Command-line interface parsing for dailyverse
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `RunConfig`: which actions to perform and the service configuration to
//! perform them with.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::notify::{InvalidTimeOfDay, TimeOfDay};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A reminder time is not a valid HH:MM value
    #[error(transparent)]
    InvalidTime(#[from] InvalidTimeOfDay),

    /// No reminder times were given
    #[error("At least one reminder time is required")]
    NoTimes,
}

/// dailyverse - A daily inspirational quote and bible verse
#[derive(Parser, Debug)]
#[command(name = "dailyverse")]
#[command(about = "Daily inspirational quote and bible verse")]
#[command(version)]
pub struct Cli {
    /// Get new inspiration even if today's content is already saved
    #[arg(long)]
    pub refresh: bool,

    /// Send today's quote and verse as notifications now
    #[arg(long)]
    pub notify: bool,

    /// Enable the daily reminder notifications
    #[arg(long)]
    pub schedule: bool,

    /// Reminder times for --schedule, comma separated
    ///
    /// Examples:
    ///   dailyverse --schedule --times 07:30
    ///   dailyverse --schedule --times 08:00,18:00
    #[arg(long, value_name = "HH:MM", value_delimiter = ',')]
    pub times: Vec<String>,

    /// Keep running and deliver reminders until interrupted (implies --schedule)
    #[arg(long)]
    pub watch: bool,

    /// Save today's quote to favorites
    #[arg(long)]
    pub favorite: bool,

    /// List saved favorite quotes and exit
    #[arg(long)]
    pub favorites: bool,

    /// Directory for saved content (defaults to the user cache directory)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the quote provider URL
    #[arg(long, value_name = "URL", hide = true)]
    pub quote_url: Option<String>,

    /// Override the verse provider URL
    #[arg(long, value_name = "URL", hide = true)]
    pub verse_url: Option<String>,
}

/// Actions and settings derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Force a refresh instead of using saved content
    pub refresh: bool,
    /// Send notifications immediately
    pub notify: bool,
    /// Install daily reminders
    pub schedule: bool,
    /// Stay running to deliver reminders
    pub watch: bool,
    /// Save today's quote to favorites
    pub favorite: bool,
    /// Only list favorites
    pub list_favorites: bool,
    /// Configuration for the services
    pub service: ServiceConfig,
}

/// Parses reminder time arguments
///
/// # Returns
/// * `Ok(Vec<TimeOfDay>)` if every value is a valid HH:MM time
/// * `Err(CliError::InvalidTime)` for the first invalid value
pub fn parse_times(values: &[String]) -> Result<Vec<TimeOfDay>, CliError> {
    let mut times = values
        .iter()
        .map(|s| s.parse::<TimeOfDay>())
        .collect::<Result<Vec<_>, _>>()?;
    if times.is_empty() {
        return Err(CliError::NoTimes);
    }
    times.sort();
    times.dedup();
    Ok(times)
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with appropriate settings
    /// * `Err(CliError)` if a reminder time is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut service = ServiceConfig::default();

        if !cli.times.is_empty() {
            service.reminder_times = parse_times(&cli.times)?;
        }
        if let Some(dir) = &cli.data_dir {
            service.data_dir = Some(dir.clone());
        }
        if let Some(url) = &cli.quote_url {
            service.quote_url = url.clone();
        }
        if let Some(url) = &cli.verse_url {
            service.verse_url = url.clone();
        }

        Ok(RunConfig {
            refresh: cli.refresh,
            notify: cli.notify,
            schedule: cli.schedule || cli.watch,
            watch: cli.watch,
            favorite: cli.favorite,
            list_favorites: cli.favorites,
            service,
        })
    }
}
