use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use viewstats::{
    analytics::{report::TextRenderer, ReportFormat, ReportManager},
    config::{AppConfig, ConfigManager, LogConfig},
    logging,
};

/// CLI用の出力形式
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    /// Plain text summary
    Text,
    /// JSON document
    Json,
    /// Excel workbook with charts
    Excel,
}

impl From<CliFormat> for ReportFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Text => ReportFormat::Text,
            CliFormat::Json => ReportFormat::Json,
            CliFormat::Excel => ReportFormat::Excel,
        }
    }
}

/// Viewing history analytics report generator
#[derive(Debug, Parser)]
#[command(name = "viewstats", version, about)]
struct Args {
    /// Viewing history CSV (Title, Date columns)
    input: Option<PathBuf>,

    /// Config file (defaults to the XDG config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write reports into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Report formats to write (repeatable)
    #[arg(short, long, value_enum)]
    format: Vec<CliFormat>,

    /// Number of top shows to list
    #[arg(short, long)]
    top: Option<usize>,

    /// Log level (trace/debug/info/warn/error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the text report to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Save the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,
}

impl Args {
    /// コマンドライン引数で設定を上書き
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if !self.format.is_empty() {
            config.formats = self.format.iter().map(|&f| f.into()).collect();
        }
        if let Some(top) = self.top {
            config.top_shows = top;
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
    }
}

/// 設定ファイルを探して読み込む
fn load_config(args: &Args) -> anyhow::Result<(ConfigManager, AppConfig)> {
    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new().context("Failed to locate config directory")?,
    };
    let config = config_manager.load_config().with_context(|| {
        format!(
            "Failed to load config: {}",
            config_manager.config_path().display()
        )
    })?;
    Ok((config_manager, config))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // ログ設定が決まるまでは一時的なサブスクライバーで出力
    let bootstrap_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| LogConfig::default().level);
    let (config_manager, mut config) =
        logging::with_bootstrap_logging(&bootstrap_level, || load_config(&args))??;
    args.apply_to(&mut config);
    config.validate()?;

    let _log_guard = logging::init_logging(&config.log)?;

    tracing::info!("🎬 Starting viewstats - viewing history analytics");
    tracing::debug!(config = ?config, "Effective configuration");

    if args.save_config {
        config_manager.save_config(&config)?;
    }

    let report = viewstats::analyze_file(&config.input, config.top_shows)
        .with_context(|| format!("Failed to analyse '{}'", config.input.display()))?;

    if args.stdout {
        print!("{}", TextRenderer::new().render_string(&report));
        return Ok(());
    }

    let paths = ReportManager::new()
        .write_reports(
            &report,
            &config.formats,
            &config.output_dir,
            &config.output_stem,
        )
        .context("Failed to write reports")?;

    for path in paths {
        println!("{}", path.display());
    }

    Ok(())
}
