use anyhow::Context;
use cartx_core::{PriceObservation, Product};
use cartx_engine::{BasketPlanner, RecommendationEngine};
use cartx_forecast::{ForecastConfig, PriceForecaster};
use cartx_index::{IndexConfig, RetrievalIndex};
use cartx_rank::{RankerConfig, ValueRanker};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// A budget-aware product recommendation engine
#[derive(Parser, Debug)]
#[command(name = "cartx")]
#[command(about = "Budget-aware product recommendations", long_about = None)]
struct Args {
    /// Path to the data directory holding model artifacts
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the search index and train the models from JSON snapshots
    Build {
        /// Product catalog snapshot (JSON array)
        #[arg(long)]
        catalog: PathBuf,

        /// Price history snapshot (JSON array); trains the forecaster
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Recommend products for a free-text query under a budget
    Recommend {
        query: String,

        /// Maximum package price
        #[arg(short, long)]
        budget: f64,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        state: Option<String>,

        /// How many recommendations to return
        #[arg(short, long, default_value_t = 5)]
        top_n: usize,
    },
    /// Plan a shopping basket against a shared budget
    Basket {
        /// Comma-separated shopping-list items
        items: String,

        /// Total budget shared across the list
        #[arg(short, long)]
        budget: f64,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        state: Option<String>,
    },
    /// Forecast the next price for a sku
    Forecast {
        sku: String,

        /// Price history snapshot (JSON array)
        #[arg(long)]
        history: PathBuf,
    },
    /// Print the price timeline for a sku
    History {
        sku: String,

        /// Price history snapshot (JSON array)
        #[arg(long)]
        history: PathBuf,
    },
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

    info!("cartx v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Build { catalog, history } => build(&args.data_dir, &catalog, history.as_deref()),
        Command::Recommend {
            query,
            budget,
            city,
            state,
            top_n,
        } => {
            let engine = load_engine(&args.data_dir)?;
            let recs = engine.recommend(&query, budget, city.as_deref(), state.as_deref(), top_n)?;
            println!("{}", serde_json::to_string_pretty(&recs)?);
            Ok(())
        }
        Command::Basket {
            items,
            budget,
            city,
            state,
        } => {
            let items: Vec<String> = items
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            let engine = load_engine(&args.data_dir)?;
            let basket =
                BasketPlanner::new(&engine).plan(&items, budget, city.as_deref(), state.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&basket)?);
            Ok(())
        }
        Command::Forecast { sku, history } => {
            let observations = read_history(&history)?;
            let forecaster = load_forecaster(&args.data_dir);
            let forecast = forecaster.predict_next(&observations, &sku)?;
            println!("{}", serde_json::to_string_pretty(&forecast)?);
            Ok(())
        }
        Command::History { sku, history } => {
            let observations = read_history(&history)?;
            let points = PriceForecaster::get_history(&observations, &sku)?;
            println!("{}", serde_json::to_string_pretty(&points)?);
            Ok(())
        }
    }
}

fn build(data_dir: &Path, catalog_path: &Path, history_path: Option<&Path>) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(catalog_path)
        .with_context(|| format!("reading catalog {}", catalog_path.display()))?;
    let catalog: Vec<Product> = serde_json::from_str(&data).context("parsing catalog JSON")?;
    info!("Loaded {} catalog rows", catalog.len());

    let mut index = RetrievalIndex::new(IndexConfig::default());
    index.build(catalog.clone());
    index.save(&data_dir.join("index"))?;

    let mut ranker = ValueRanker::default();
    ranker.fit(&catalog);
    if ranker.is_trained() {
        ranker.save(&data_dir.join("ranker.bin"))?;
    } else {
        warn!("Ranker not trained; recommendations will use the rule fallback");
    }

    if let Some(history_path) = history_path {
        let observations = read_history(history_path)?;
        let mut forecaster = PriceForecaster::default();
        forecaster.train(&observations);
        if forecaster.is_trained() {
            forecaster.save(&data_dir.join("forecaster.bin"))?;
        } else {
            warn!("Forecaster not trained; predictions will use the last known price");
        }
    }

    info!("Build complete: artifacts in {}", data_dir.display());
    Ok(())
}

/// Assemble the engine from persisted artifacts. A missing ranker
/// artifact is not fatal: the engine falls back to rule-based ranking.
fn load_engine(data_dir: &Path) -> anyhow::Result<RecommendationEngine> {
    let index = RetrievalIndex::load(&data_dir.join("index"), IndexConfig::default())?;

    let ranker_path = data_dir.join("ranker.bin");
    let ranker = if ranker_path.exists() {
        ValueRanker::load(&ranker_path, RankerConfig::default())?
    } else {
        warn!("No ranker artifact at {}; using rule fallback", ranker_path.display());
        ValueRanker::default()
    };

    Ok(RecommendationEngine::new(index, ranker))
}

fn load_forecaster(data_dir: &Path) -> PriceForecaster {
    let path = data_dir.join("forecaster.bin");
    match PriceForecaster::load(&path, ForecastConfig::default()) {
        Ok(forecaster) => forecaster,
        Err(e) => {
            warn!("No usable forecast model ({}); using last-price fallback", e);
            PriceForecaster::default()
        }
    }
}

fn read_history(path: &Path) -> anyhow::Result<Vec<PriceObservation>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading history {}", path.display()))?;
    let observations: Vec<PriceObservation> =
        serde_json::from_str(&data).context("parsing history JSON")?;
    info!("Loaded {} price observations", observations.len());
    Ok(observations)
}
