use anyhow::Context;
use clap::Parser;
use pillx::{Catalog, ColorTable, MatchResponse, Matcher, MatcherConfig, ObservedAttributes, PolicyVersion};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Identify a pill from its observed shape, color and imprint
#[derive(Parser, Debug)]
#[command(name = "pillx")]
#[command(about = "Rank catalog pills against observed attributes", long_about = None)]
struct Args {
    /// Catalog snapshot, a JSON array of records
    #[arg(short, long)]
    catalog: PathBuf,

    /// Shape classifier output, e.g. "원형 (90%), 타원형 (10%)"
    #[arg(short, long, default_value = "")]
    shape: String,

    /// Detected colors, space separated
    #[arg(long, default_value = "")]
    colors: String,

    /// Recognized imprint text
    #[arg(short, long, default_value = "")]
    imprint: String,

    /// Maximum number of candidates (overrides the config file)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Scoring policy, v1 or v2 (overrides the config file)
    #[arg(long)]
    policy: Option<PolicyVersion>,

    /// Matcher configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON response with score breakdowns
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => MatcherConfig::from_json_file(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => MatcherConfig::default(),
    };
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }

    let catalog = Catalog::from_json_file(&args.catalog)
        .with_context(|| format!("loading catalog {:?}", args.catalog))?;
    info!("Loaded {} catalog records from {:?}", catalog.len(), args.catalog);

    let matcher = Matcher::new(config, Arc::new(ColorTable::standard()))?;
    info!("Scoring policy: {}", matcher.policy().version());

    let observed = ObservedAttributes::new(args.shape.as_str(), &args.colors, &args.imprint);
    let outcome = matcher.identify(&catalog, &observed);

    if args.json {
        let response = MatchResponse::from_outcome(outcome, true);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if outcome.candidates.is_empty() {
        println!("No matching pill found in the catalog");
        return Ok(());
    }

    for (rank, candidate) in outcome.candidates.iter().enumerate() {
        println!("{:>2}. {} (score: {:.1})", rank + 1, candidate.summary, candidate.score);
    }
    Ok(())
}
