//! image-insights CLI
//!
//! Describes one image with the image-analysis crew and prints the answer.

use anyhow::{Context, Result};
use clap::Parser;
use image_insights::logging::{LogLevel, init_logging};
use image_insights::{Config, DEFAULT_IMAGE_URL, ImageAnalyst, ImageAnalyzer, ImageReference};

#[derive(Parser, Debug)]
#[command(name = "image-insights", version, about = "Describe an image with a multimodal LLM")]
struct Cli {
    /// Image URL or local file path
    #[arg(long, default_value = DEFAULT_IMAGE_URL)]
    image: String,

    /// Model identifier, overrides IMAGE_INSIGHTS_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Log the agent's prompts and answers
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogLevel::from_verbose(cli.verbose));

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    let analyst = ImageAnalyst::new(config)?.verbose(cli.verbose);
    let image = ImageReference::parse(&cli.image);

    println!("Starting image analysis with Gemini vision...");
    let output = analyst
        .analyze(&image)
        .await
        .with_context(|| format!("failed to analyze {}", image))?;

    println!("\nFinal Result:");
    println!("{}", output);
    Ok(())
}
