use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use thumbgrab_server::config::{AppConfig, CliConfig, FileConfig};
use thumbgrab_server::fetcher::{BatchOrchestrator, CdnFetcher};
use thumbgrab_server::gateway::{HistoryFolderGateway, HttpGateway};
use thumbgrab_server::quota::{DailyGuestQuota, GuestQuotaConfig};
use thumbgrab_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values set there override CLI flags.
    #[clap(long)]
    pub config_file: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Timeout in seconds for thumbnail CDN and title lookup requests.
    #[clap(long, default_value_t = 30)]
    pub fetch_timeout_sec: u64,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// URL of the persistence service for history, folders and uploads.
    /// History and folder endpoints answer 501 when not configured.
    #[clap(long)]
    pub gateway_url: Option<String>,

    /// Timeout in seconds for persistence service requests.
    #[clap(long, default_value_t = 30)]
    pub gateway_timeout_sec: u64,

    /// Daily download ceiling for anonymous callers.
    #[clap(long, default_value_t = 10)]
    pub guest_daily_limit: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config_file
        .as_ref()
        .map(|path| FileConfig::load(path))
        .transpose()?;

    let cli_config = CliConfig {
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        fetch_timeout_sec: cli_args.fetch_timeout_sec,
        frontend_dir_path: cli_args.frontend_dir_path,
        gateway_url: cli_args.gateway_url,
        gateway_timeout_sec: cli_args.gateway_timeout_sec,
        guest_daily_limit: cli_args.guest_daily_limit,
    };
    let config = AppConfig::resolve(&cli_config, file_config);

    let fetcher = Arc::new(CdnFetcher::new(config.fetch_timeout_sec));
    let orchestrator = Arc::new(BatchOrchestrator::new(fetcher));

    let quota = Arc::new(DailyGuestQuota::new(GuestQuotaConfig {
        daily_limit: config.guest_daily_limit,
    }));

    let gateway: Option<Arc<dyn HistoryFolderGateway>> = match config.gateway_url.clone() {
        Some(url) => {
            info!("Persistence service configured at {}", url);
            Some(Arc::new(HttpGateway::new(url, config.gateway_timeout_sec))
                as Arc<dyn HistoryFolderGateway>)
        }
        None => {
            info!("No persistence service configured, history and folders are disabled");
            None
        }
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            frontend_dir_path: config.frontend_dir_path.clone(),
        },
        orchestrator,
        quota,
        gateway,
    )
    .await
}
