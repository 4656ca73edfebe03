mod config;
mod notify;

use clap::Parser;
use config::Config;
use leafmatch::dataset::{load_reference_set, LoadReport};
use leafmatch::image::io::load_color_image;
use leafmatch::report::{decision_line, score_line};
use leafmatch::{
    normalize, MatchResult, Matcher, Notification, Notifier, ScanObserver, ScoreObservation,
    Threshold,
};
use notify::{DryRunNotifier, MailNotifier};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "LeafMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Query image, overriding `query_path` from the config.
    #[arg(short, long, value_name = "IMAGE")]
    image: Option<PathBuf>,
    /// Log the notification instead of sending it.
    #[arg(long)]
    dry_run: bool,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

/// Prints one progress line per scored record.
struct ConsoleReporter;

impl ScanObserver for ConsoleReporter {
    fn on_score(&mut self, observation: &ScoreObservation) {
        println!("{}", score_line(observation));
        if let Some(err) = observation.error() {
            println!("  (image {} could not be compared: {err})", observation.index + 1);
        }
    }
}

#[derive(Debug, Serialize)]
struct ScoreRecord {
    index: usize,
    score: f64,
    computed: bool,
    error: Option<String>,
}

impl From<&ScoreObservation> for ScoreRecord {
    fn from(value: &ScoreObservation) -> Self {
        Self {
            index: value.index,
            score: value.score,
            computed: value.is_computed(),
            error: value.error().map(|err| err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    index: usize,
    label: String,
    auxiliary_value: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct DatasetSummary {
    attempted: usize,
    loaded: usize,
    omitted: usize,
}

impl From<&LoadReport> for DatasetSummary {
    fn from(value: &LoadReport) -> Self {
        Self {
            attempted: value.attempted,
            loaded: value.loaded,
            omitted: value.omitted(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
enum Delivery {
    Sent,
    Skipped,
    Failed(String),
}

#[derive(Debug, Serialize)]
struct Output {
    matched: bool,
    best: Option<MatchRecord>,
    scores: Vec<ScoreRecord>,
    dataset: DatasetSummary,
    notification: Delivery,
}

impl Output {
    fn new(result: &MatchResult, report: &LoadReport, notification: Delivery) -> Self {
        Self {
            matched: result.matched(),
            best: result.found().map(|found| MatchRecord {
                index: found.index,
                label: found.label.clone(),
                auxiliary_value: found.auxiliary_value.clone(),
                score: found.score,
            }),
            scores: result.observations().iter().map(ScoreRecord::from).collect(),
            dataset: report.into(),
            notification,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("leafmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)
        .map_err(|err| format!("cannot read config {}: {err}", cli.config.display()))?;
    let config: Config = serde_json::from_str(&config_text)?;
    config.validate(cli.image.as_ref())?;
    let threshold = Threshold::new(config.match_threshold)?;
    let query_path = cli
        .image
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.query_path));

    let query = load_color_image(&query_path)
        .map(|color| normalize(&color))
        .map_err(|err| format!("error processing image {}: {err}", query_path.display()))?;

    let references = load_reference_set(&config.dataset.to_config())?;
    if references.is_empty() {
        return Err("no valid images found from the metadata file".into());
    }

    let result = Matcher::new().find_match_observed(
        query.view(),
        references.records(),
        threshold,
        &mut ConsoleReporter,
    );
    println!("{}", decision_line(&result));

    let notification = Notification::for_result(&result);
    let delivery = if cli.dry_run || !config.notify.enabled {
        match DryRunNotifier.send(&notification) {
            Ok(()) => Delivery::Skipped,
            Err(err) => Delivery::Failed(err.to_string()),
        }
    } else {
        match MailNotifier::from_config(&config.notify).and_then(|n| n.send(&notification)) {
            Ok(()) => Delivery::Sent,
            Err(err) => {
                eprintln!("notification failed: {err}");
                Delivery::Failed(err.to_string())
            }
        }
    };

    if let Some(path) = &config.output_path {
        let output = Output::new(&result, references.report(), delivery);
        fs::write(path, serde_json::to_string_pretty(&output)?)?;
    }

    Ok(())
}
