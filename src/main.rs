use anyhow::Result;
use clap::{Parser, ValueEnum};
use eseries_exporter::{config::Config, server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "ESERIES_EXPORTER_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long, env = "ESERIES_EXPORTER_ADDR")]
    addr: Option<String>,

    /// Default log level; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match args.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    info!(
        "Starting E-Series Prometheus Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut config = Config::load(&args.config)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    info!("Configuration loaded successfully");
    let mut modules: Vec<&str> = config.modules.keys().map(String::as_str).collect();
    modules.sort_unstable();
    info!("Configured modules: {:?}", modules);
    info!(
        "Scrape endpoint: http://{}:{}/eseries",
        config.server.addr, config.server.port
    );

    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
