use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clouddns_updater::{ipv4source::DEFAULT_ENDPOINT, schedule::DEFAULT_INTERVAL};
use log::LevelFilter;

macro_rules! env_prefix {
    () => {
        "CLOUDDNS_UPDATER_"
    };
}

/// Keep Cloudflare A records pointed at this machine's public IPv4 address.
///
/// The configuration is read as TOML from stdin, unless --config is given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pass `check` to only validate the configuration against the provider, then exit
    #[arg(value_enum)]
    pub mode: Option<Mode>,

    /// Read the configuration from this file instead of stdin
    #[arg(
        short = 'c',
        long,
        value_name = "PATH",
        env = concat!(env_prefix!(), "CONFIG")
    )]
    pub config: Option<PathBuf>,

    /// Set the loglevel of the application
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Info,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOGLEVEL")
    )]
    pub loglevel: Loglevel,

    /// Only run a single update, then exit
    #[arg(long, default_value_t = false, action)]
    pub run_once: bool,

    /// Time to wait between update operations in seconds
    #[arg(
        short = 'i',
        long,
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        env = concat!(env_prefix!(), "INTERVAL")
    )]
    pub interval: u64,

    /// URL of the service that echoes back our public IPv4 address
    #[arg(
        long,
        default_value = DEFAULT_ENDPOINT,
        value_name = "URL",
        env = concat!(env_prefix!(), "IP_ENDPOINT")
    )]
    pub ip_endpoint: String,
}

/// What to do with the configuration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Mode {
    /// Verify credentials and zone access, without changing any records
    Check,
}

/// Used to set the applications loglevel
// This is essentially a re-creation of log:Level. However, that enum doesn't derive ValueEnum, so we have to do it manually here
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}
