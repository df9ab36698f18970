use super::api::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "founders-fuel";

#[derive(Parser, Debug)]
#[command(name = "founders-fuel", version, about = "Founders Fuel application intake client")]
pub struct Config {
    /// Base URL of the intake API
    #[arg(long, env = "FOUNDERS_FUEL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where the auth token and cached profile are kept
    #[arg(long, env = "FOUNDERS_FUEL_SESSION", value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    /// Log file (the terminal is taken by the UI)
    #[arg(long, env = "FOUNDERS_FUEL_LOG", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| data_dir().join("session.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_dir().join("founders-fuel.log"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
