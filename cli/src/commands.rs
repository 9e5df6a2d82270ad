pub mod merge;
pub mod parse;
pub mod plan;
pub mod survey;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use wavemap_common::wifi::dialect::Dialect;
use wavemap_core::filter::BandOfInterest;

#[derive(Parser)]
#[command(name = "wavemap")]
#[command(about = "A wifi spectrum survey tool.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output (-q results only, -qq summary only)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Skip the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a saved scan dump and print the resolved records
    #[command(alias = "p")]
    Parse {
        /// Path to the dump file
        file: PathBuf,
        /// Dump format: iw or iwlist
        #[arg(long, default_value = "iw")]
        dialect: Dialect,
        /// Only show records occupying this band, e.g. 5600-5650
        #[arg(long)]
        band: Option<BandOfInterest>,
    },
    /// Scan periodically and log the access points around you
    #[command(alias = "s")]
    Survey(SurveyArgs),
    /// Show the channel plan table
    #[command(alias = "c")]
    Plan,
    /// Fold one store file into another
    #[command(alias = "m")]
    Merge {
        /// Store that receives the merged rows
        dest: PathBuf,
        /// Store to read from (left untouched)
        src: PathBuf,
    },
}

#[derive(Args)]
pub struct SurveyArgs {
    /// Wireless interface to scan with
    #[arg(long, default_value = "wlo1")]
    pub iface: String,

    /// Scan through a router instead: user@host, running iwlist remotely
    #[arg(long)]
    pub ssh: Option<String>,

    /// Remote interface used with --ssh
    #[arg(long, default_value = "ath0")]
    pub ssh_iface: String,

    /// Replay a saved dump instead of scanning
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Dialect of --file
    #[arg(long, default_value = "iw")]
    pub dialect: Dialect,

    /// Record every round into this SQLite store
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Attach a phone GPS fix to every batch
    #[arg(long)]
    pub gps: bool,

    /// Antenna orientation in degrees, stored with every measurement
    #[arg(long)]
    pub orientation: Option<f64>,

    /// Seconds between scan rounds
    #[arg(long, default_value_t = 10)]
    pub interval: u64,

    /// Run a single round and exit
    #[arg(long)]
    pub once: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Capture timestamp for a batch, seconds since the epoch.
pub(crate) fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
