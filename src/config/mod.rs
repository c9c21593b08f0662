mod file_config;

pub use file_config::{FileConfig, GatewayConfig, QuotaConfig};

use crate::server::RequestsLoggingLevel;

/// CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub fetch_timeout_sec: u64,
    pub frontend_dir_path: Option<String>,
    pub gateway_url: Option<String>,
    pub gateway_timeout_sec: u64,
    pub guest_daily_limit: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub fetch_timeout_sec: u64,
    pub frontend_dir_path: Option<String>,
    pub gateway_url: Option<String>,
    pub gateway_timeout_sec: u64,
    pub guest_daily_limit: u32,
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    match s.to_lowercase().as_str() {
        "none" => Some(RequestsLoggingLevel::None),
        "path" => Some(RequestsLoggingLevel::Path),
        "headers" => Some(RequestsLoggingLevel::Headers),
        _ => None,
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Self {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());
        let fetch_timeout_sec = file.fetch_timeout_sec.unwrap_or(cli.fetch_timeout_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let gw_file = file.gateway.unwrap_or_default();
        let gateway_url = gw_file.url.or_else(|| cli.gateway_url.clone());
        let gateway_timeout_sec = gw_file.timeout_sec.unwrap_or(cli.gateway_timeout_sec);

        let quota_file = file.quota.unwrap_or_default();
        let guest_daily_limit = quota_file.guest_daily_limit.unwrap_or(cli.guest_daily_limit);

        AppConfig {
            port,
            logging_level,
            fetch_timeout_sec,
            frontend_dir_path,
            gateway_url,
            gateway_timeout_sec,
            guest_daily_limit,
        }
    }
}
