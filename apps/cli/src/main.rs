use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use kompas_core::{
    AnalyzerConfig, Facet, HttpAnalyzer, JsonFileCatalog, PacingConfig, RecordCatalog, Scheduler,
    SubprocessExtractor, format_stats_block, format_transcript_with_timestamps,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for the Facet enum (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliFacet {
    Transcript,
    Analysis,
}

impl From<CliFacet> for Facet {
    fn from(cli: CliFacet) -> Self {
        match cli {
            CliFacet::Transcript => Facet::Transcript,
            CliFacet::Analysis => Facet::Analysis,
        }
    }
}

#[derive(Parser)]
#[command(name = "kompas-enrich")]
#[command(
    about = "Batch-enrich the kompas video catalog with time-coded transcripts and AI career analysis"
)]
struct Cli {
    /// Which enrichment facet to run
    #[arg(value_enum, required_unless_present = "dump")]
    facet: Option<CliFacet>,

    /// Path to the catalog JSON file
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Transcript extractor script, invoked once per item with the video id
    #[arg(long, default_value = "scripts/extract_transcripts.py")]
    script: PathBuf,

    /// Interpreter used to run the extractor script
    #[arg(long, default_value = "python3")]
    python: String,

    /// Analysis API endpoint
    #[arg(long)]
    api_url: Option<String>,

    /// Analysis model name
    #[arg(long)]
    model: Option<String>,

    /// Analysis output language
    #[arg(long, default_value = "en")]
    language: String,

    /// Items per batch
    #[arg(short, long, default_value_t = kompas_core::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Delay between boundary calls within a batch, in seconds
    #[arg(long, default_value_t = 3)]
    inter_request_secs: u64,

    /// Delay between batches, in seconds
    #[arg(long, default_value_t = 30)]
    inter_batch_secs: u64,

    /// Cooldown after a block-classified failure, in seconds
    #[arg(long, default_value_t = 300)]
    cooldown_secs: u64,

    /// Hard timeout for one extraction call, in seconds
    #[arg(long, default_value_t = kompas_core::EXTRACT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Process at most this many eligible records
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the stored transcript for one record and exit
    #[arg(long, value_name = "ID")]
    dump: Option<String>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kompas")
        .join("catalog.json")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let catalog_path = cli.catalog.unwrap_or_else(default_catalog_path);
    let catalog = Arc::new(JsonFileCatalog::new(&catalog_path));

    if let Some(id) = cli.dump {
        return dump_transcript(catalog.as_ref(), &id).await;
    }

    // required_unless_present guarantees this
    let facet: Facet = cli.facet.expect("facet argument").into();

    let analyzer_config = AnalyzerConfig {
        api_url: cli
            .api_url
            .unwrap_or_else(|| kompas_core::analyzer::DEFAULT_ANALYSIS_URL.to_string()),
        model: cli
            .model
            .unwrap_or_else(|| kompas_core::analyzer::DEFAULT_ANALYSIS_MODEL.to_string()),
        language: cli.language,
        ..AnalyzerConfig::default()
    };

    // Validate the API key early so a misconfigured run fails before pacing in.
    if facet == Facet::Analysis {
        if let Err(e) = analyzer_config.validate_api_key() {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }

    println!(
        "\n{}  {}\n",
        style("kompas").cyan().bold(),
        style("Media Enrichment").dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    let spinner = create_spinner("Scanning catalog...");
    let total = match catalog.list().await {
        Ok(records) => records.len(),
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    spinner.finish_with_message(format!(
        "{} Catalog: {} records ({})",
        style("✓").green().bold(),
        total,
        style(catalog_path.display().to_string()).dim()
    ));

    let extractor = SubprocessExtractor::new(cli.python, vec![cli.script.display().to_string()])
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    let analyzer = HttpAnalyzer::new(analyzer_config);

    let pacing = PacingConfig {
        inter_request: Duration::from_secs(cli.inter_request_secs),
        inter_batch: Duration::from_secs(cli.inter_batch_secs),
        block_cooldown: Duration::from_secs(cli.cooldown_secs),
    };

    let scheduler = Scheduler::new(catalog, Arc::new(extractor), Arc::new(analyzer))
        .with_batch_size(cli.batch_size)
        .with_pacing(pacing)
        .with_limit(cli.limit);

    let total_start = Instant::now();
    let stats = scheduler.run(facet).await?;

    println!("\n{}", style("─".repeat(60)).dim());
    println!("{}", format_stats_block(&stats));
    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    Ok(())
}

async fn dump_transcript(catalog: &JsonFileCatalog, id: &str) -> Result<()> {
    let records = catalog.list().await?;
    let Some(record) = records.iter().find(|r| r.id == id) else {
        eprintln!("{} no record with id {}", style("Error:").red().bold(), id);
        std::process::exit(1);
    };
    match &record.transcript {
        Some(transcript) => {
            println!("{}", format_transcript_with_timestamps(transcript));
        }
        None => {
            println!("{} has no transcript yet", id);
        }
    }
    Ok(())
}
