use anyhow::Result;
use clap::Parser;
use purefa_exporter::{
    config::{Config, SAMPLE_CONFIG},
    server,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// FlashArray management address (overrides config)
    #[arg(long, env = "PUREFA_ARRAY")]
    array: Option<String>,

    /// FlashArray API token (overrides config)
    #[arg(long, env = "PUREFA_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Port to listen on for metrics (overrides config, default 9491)
    #[arg(short, long, env = "EXPORTER_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides config, default 0.0.0.0)
    #[arg(short, long, env = "EXPORTER_ADDR")]
    addr: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    sample_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.sample_config {
        print!("{}", SAMPLE_CONFIG);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Pure FlashArray Exporter v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::load(&args.config)?
        .with_overrides(args.array, args.api_token, args.addr, args.port);

    info!("Configuration loaded successfully");
    info!("FlashArray: {}", config.purefa.array);
    info!(
        "Metrics endpoint: http://{}:{}/metrics",
        config.server.addr, config.server.port
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
