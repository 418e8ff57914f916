use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bakery::domain::ports::IdentityGatewayPort;
use bakery::infrastructure::{
    AppConfig, CliArgs, ConfigFile, FileReminderStore, FirebaseIdentityClient,
    InMemoryIdentityGateway, KeyringSessionStorage,
};
use bakery::presentation::{App, AppSettings};

const OFFLINE_LATENCY: Duration = Duration::from_millis(400);

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let mut config = ConfigFile::resolve(args.config.as_deref())?.load()?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_app(config: &AppConfig) -> Result<App> {
    let api_key = config.identity.remote_api_key();
    let gateway: Arc<dyn IdentityGatewayPort> = match api_key {
        Some(api_key) => Arc::new(FirebaseIdentityClient::new(api_key, &config.identity)?),
        None => {
            info!("No identity API key configured, running offline");
            Arc::new(InMemoryIdentityGateway::new().with_latency(OFFLINE_LATENCY))
        }
    };

    let reminders_path = config
        .effective_reminders_path()
        .ok_or_else(|| eyre!("failed to determine data directory for reminders"))?;
    info!(path = %reminders_path.display(), "Using reminder store");

    let settings = AppSettings {
        request_timeout: config.identity.request_timeout(),
        // Offline accounts do not outlive the process, so neither should sessions.
        remember_session: api_key.is_some() && config.session.remember_session,
    };

    Ok(App::new(
        gateway,
        Arc::new(KeyringSessionStorage::new()),
        Arc::new(FileReminderStore::new(reminders_path)),
        settings,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = bakery::VERSION, offline = config.identity.offline, "Starting Bakery");

    let app = create_app(&config)?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
