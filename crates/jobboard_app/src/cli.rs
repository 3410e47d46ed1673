//! Command-line configuration.
use std::num::NonZeroUsize;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use jobboard_core::DEFAULT_PAGE_SIZE;
use jobboard_engine::FetchSettings;
use log::LevelFilter;

pub const DEFAULT_URL: &str = "https://jsonfakery.com/jobs";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// Write to ./jobboard.log in the current directory.
    File,
    /// Write to the terminal (stderr for warnings, stdout otherwise).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Parser)]
#[command(name = "jobboard", version, about = "Browse a remote job listing feed from the terminal")]
pub struct Cli {
    /// Endpoint returning a JSON array of listings.
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Listings shown per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: NonZeroUsize,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchSettings::default()
        }
    }
}
