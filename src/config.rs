/*
Runtime configuration for the tracker service.
Priority, highest first: CLI arguments, then environment variables
(clap `env` attribute), then compiled defaults.
*/

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Weekday;

use crate::store::DEFAULT_DATA_PATH;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {addr:?}: {source}")]
    BindAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
}

/// First day of the reporting week.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl From<WeekStart> for Weekday {
    fn from(w: WeekStart) -> Self {
        match w {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

/// CLI arguments for the tracker service.
#[derive(clap::Parser, Debug, Clone)]
#[command(version, about = "Ministry activity time tracker")]
pub struct CliArgs {
    /// Address to serve the API and PWA on.
    #[arg(short, long, env = "MINISTRY_TRACKER_ADDR", default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// JSON file the task list is stored in.
    #[arg(short, long, env = "MINISTRY_TRACKER_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data_file: PathBuf,

    /// Directory with the PWA's static assets.
    #[arg(long, env = "MINISTRY_TRACKER_STATIC", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    #[arg(long, env = "MINISTRY_TRACKER_WEEK_START", value_enum, default_value_t = WeekStart::Sunday)]
    pub week_start: WeekStart,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub week_start: Weekday,
}

impl Config {
    /// # Errors
    ///
    /// Returns [`ConfigError::BindAddr`] if the bind address does not parse.
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let bind_addr = args.bind.parse().map_err(|source| ConfigError::BindAddr {
            addr: args.bind.clone(),
            source,
        })?;

        Ok(Self {
            bind_addr,
            data_file: args.data_file,
            static_dir: args.static_dir,
            week_start: args.week_start.into(),
        })
    }
}
