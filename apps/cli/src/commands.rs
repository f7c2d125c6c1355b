//! CLI definition, tracing setup, and the convert entry point.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use chm2docset_core::pipeline::{self, ConvertConfig, ConvertResult, ProgressReporter};
use chm2docset_extract::SystemExtractor;
use chm2docset_shared::load_config;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// chm2docset — turn compiled HTML help into searchable docset bundles.
#[derive(Parser)]
#[command(
    name = "chm2docset",
    version,
    about = "Convert a compiled HTML help container into a searchable docset bundle.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Source help container (.chm) to convert.
    pub source: PathBuf,

    /// Output directory, or an explicit `.docset` bundle path
    /// (defaults to the current directory).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Platform family label recorded in the bundle descriptor
    /// (defaults to "unknown").
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Global level directives: the workspace crates are all chm2docset_*,
    // which a single target prefix cannot cover.
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Convert entry point
// ---------------------------------------------------------------------------

/// Run the conversion described by the parsed CLI.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    // Config file values sit under CLI flags, above built-in defaults.
    let config = load_config()?;

    let output = cli
        .out
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir));
    let platform = cli
        .platform
        .unwrap_or_else(|| config.defaults.platform.clone());
    let extractor = match &config.extractor.command {
        Some(command) => SystemExtractor::with_command(command),
        None => SystemExtractor::new(),
    };

    let convert_config = ConvertConfig {
        source: cli.source,
        output,
        platform,
    };

    info!(
        source = %convert_config.source.display(),
        out = %convert_config.output.display(),
        platform = %convert_config.platform,
        "converting help container"
    );

    let reporter = CliProgress::new();
    let result = pipeline::convert(&convert_config, &extractor, &reporter).await?;

    println!();
    println!("  Docset created successfully!");
    println!("  Bundle: {}", result.docset_path.display());
    println!("  Pages:  {}", result.document_count);
    println!("  Time:   {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_indexed(&self, path: &str, count: usize) {
        self.spinner
            .set_message(format!("Indexing [{count}] {path}"));
    }

    fn done(&self, _result: &ConvertResult) {
        self.spinner.finish_and_clear();
    }
}
