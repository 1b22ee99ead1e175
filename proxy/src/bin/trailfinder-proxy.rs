use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use trailfinder_core::config::{GeminiConfig, ProxyConfig};
use trailfinder_proxy::http_server;
use trailfinder_proxy::ProxyService;

#[derive(Parser, Debug)]
#[command(name = "trailfinder-proxy", about = "Gemini proxy for the hiking club trail finder")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gemini API key (overrides API_KEY / GEMINI_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Gemini model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// HTTP server address
    #[arg(long)]
    http_addr: Option<String>,

    /// Path the proxy is served on
    #[arg(long)]
    endpoint_path: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_level(level: Option<&str>) -> Level {
    match level.map(|l| l.to_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line args
    let args = Args::parse();

    // Load config from file or use defaults
    let file_config = match &args.config {
        Some(path) => ProxyConfig::load_from_file(path),
        None => ProxyConfig::load_from_default(),
    }
    .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let mut config = file_config;
    config.apply_process_env();

    // Update config from CLI args
    let cli_config = ProxyConfig {
        listen_addr: args.http_addr,
        endpoint_path: args.endpoint_path,
        log_level: args.log_level,
        gemini: GeminiConfig {
            api_key: args.api_key,
            model_name: args.model,
            api_base_url: None,
            temperature: None,
            request_timeout_secs: None,
        },
    };
    let config = config.merge(&cli_config);

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(config.log_level.as_deref()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("Starting trail finder proxy");

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", config.listen_addr(), e))?;

    // The key is validated once here; a missing key still serves, failing every request
    let service = ProxyService::from_config(&config.gemini);
    if !service.is_configured() {
        warn!("Set API_KEY or pass --api-key to enable trail suggestions");
    }

    if let Err(e) = http_server::run_server(service, config.endpoint_path(), addr).await {
        error!(error = %e, "HTTP server failed");
        return Err(e);
    }

    info!("Trail finder proxy shutting down");
    Ok(())
}
