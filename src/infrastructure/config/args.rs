use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "bakery",
    version,
    about = "Terminal storefront for the neighbourhood bakery",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Use the in-process account directory instead of the identity provider.
    #[arg(long)]
    pub offline: bool,

    /// Identity provider web API key.
    #[arg(long, env = "BAKERY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds before an auth request is reported as timed out.
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Keep the session in the system keyring between launches.
    #[arg(long)]
    pub remember_session: Option<bool>,
}
