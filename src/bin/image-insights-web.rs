//! image-insights web form
//!
//! Serves the single-page image analysis form.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use image_insights::logging::{LogLevel, init_logging};
use image_insights::web::{AppState, run_server};
use image_insights::{Config, ImageAnalyst, ImageAnalyzer};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "image-insights-web", version, about = "Web form for image analysis")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8501)]
    port: u16,

    /// Log the agent's prompts and answers
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogLevel::from_verbose(cli.verbose));

    // Configuration errors are reported on the page, not at startup
    let analyzer = Config::load().and_then(ImageAnalyst::new).map(|analyst| {
        info!(model = %analyst.config().model, "Image analysis enabled");
        Arc::new(analyst.verbose(cli.verbose)) as Arc<dyn ImageAnalyzer>
    });
    if let Err(e) = &analyzer {
        warn!(error = %e, "Image analysis disabled");
    }

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cli.host, cli.port))?;

    run_server(AppState::from_startup(analyzer), addr)
        .await
        .context("web server failed")?;
    Ok(())
}
