mod chat_cmd;
mod config;
mod ocr_cmd;
mod order_cmd;
mod prompt;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rx_assist_core::ocr::{Preprocessor, Preset};
use rx_assist_core::{MatcherConfig, PharmacyContext, Scorer};

use config::Config;
use order_cmd::{OrderFormat, TextSource};
use prompt::parse_quantity_arg;

#[derive(Parser)]
#[command(name = "rx-assist")]
#[command(about = "Prescription OCR chat and pharmacy order builder")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Inventory CSV with MedicineName, QuantityInStock, PriceInRupees
    #[arg(long, global = true)]
    inventory: Option<PathBuf>,

    /// Tesseract binary
    #[arg(long, global = true)]
    tesseract: Option<String>,

    /// Tesseract language(s), e.g. eng or eng+hin
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Tesseract page segmentation mode, 0 - 13
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=13))]
    psm: Option<u8>,

    /// Minimum match score, 0 - 100
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Similarity function: weighted or ratio
    #[arg(long, global = true, default_value = "weighted")]
    scorer: Scorer,

    /// Gemini model name
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a prescription image and ask questions about it
    Chat {
        /// Prescription image (jpg, jpeg, png, bmp)
        #[arg(long)]
        image: PathBuf,
        /// Question to ask; repeatable. Reads from stdin when omitted
        #[arg(short, long)]
        question: Vec<String>,
    },
    /// Build a pharmacy order from a prescription
    Order {
        /// Prescription image (jpg, jpeg, png, bmp)
        #[arg(long, required_unless_present = "text", conflicts_with = "text")]
        image: Option<PathBuf>,
        /// Prescription text, skipping OCR
        #[arg(long)]
        text: Option<String>,
        /// Quantity for a medicine as NAME=QTY; repeatable. Others are prompted for
        #[arg(short, long = "quantity", value_parser = parse_quantity_arg)]
        quantities: Vec<(String, u32)>,
        /// Print only the order JSON
        #[arg(long, conflicts_with = "csv")]
        json_only: bool,
        /// Print only the order as CSV
        #[arg(long)]
        csv: bool,
    },
    /// Show which inventory medicines a prescription text matches
    Match {
        /// Prescription text
        #[arg(long)]
        text: String,
    },
    /// Print the text extracted from a prescription image
    Ocr {
        /// Prescription image (jpg, jpeg, png, bmp)
        #[arg(long)]
        image: PathBuf,
        /// Preprocessing preset: chat or order
        #[arg(long, default_value = "chat")]
        preset: Preset,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_config = Config::from_env();

    let config = Config {
        inventory_path: cli.inventory.unwrap_or(env_config.inventory_path),
        tesseract_cmd: cli.tesseract.unwrap_or(env_config.tesseract_cmd),
        tesseract_lang: cli.lang.unwrap_or(env_config.tesseract_lang),
        tesseract_psm: cli.psm.unwrap_or(env_config.tesseract_psm),
        match_threshold: cli.threshold.unwrap_or(env_config.match_threshold),
        llm_model: cli.model.unwrap_or(env_config.llm_model),
        ..env_config
    };

    // Initialize structured logging on stderr
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matcher_config = MatcherConfig {
        threshold: config.match_threshold,
        scorer: cli.scorer,
    };

    match cli.command {
        Commands::Chat { image, question } => chat_cmd::run(&config, &image, &question)?,
        Commands::Order {
            image,
            text,
            quantities,
            json_only,
            csv,
        } => {
            let ctx = load_context(&config, matcher_config)?;
            let source = match (image, text) {
                (Some(path), _) => TextSource::Image(path),
                (None, Some(text)) => TextSource::Text(text),
                (None, None) => anyhow::bail!("either --image or --text is required"),
            };
            let format = match (json_only, csv) {
                (true, _) => OrderFormat::Json,
                (false, true) => OrderFormat::Csv,
                (false, false) => OrderFormat::Full,
            };
            order_cmd::run(&config, &ctx, source, &quantities, format)?;
        }
        Commands::Match { text } => {
            let ctx = load_context(&config, matcher_config)?;
            order_cmd::run_match(&ctx, &text)?;
        }
        Commands::Ocr { image, preset } => {
            ocr_cmd::run(&config, &image, &Preprocessor::from_preset(preset))?
        }
    }

    Ok(())
}

fn load_context(config: &Config, matcher_config: MatcherConfig) -> Result<PharmacyContext> {
    let ctx = PharmacyContext::load(&config.inventory_path, matcher_config).with_context(|| {
        format!(
            "failed to load inventory from {}",
            config.inventory_path.display()
        )
    })?;
    info!(
        records = ctx.inventory().len(),
        threshold = matcher_config.threshold,
        scorer = %matcher_config.scorer,
        "Inventory ready"
    );
    Ok(ctx)
}
