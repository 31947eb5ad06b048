use anyhow::{bail, Context, Result};
use assessment_recommender::{
    catalog::{Catalog, CatalogHandle},
    config::Config,
    evaluation::{self, round2},
    generation::{self, GeminiClient},
    server::{self, AppState},
    Recommender,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recommender")]
#[command(about = "Recommend assessments from a catalog for a free-text query", long_about = None)]
struct Cli {
    /// Catalog CSV (overrides RECOMMENDER_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides RECOMMENDER_BIND_ADDR)
        #[arg(long)]
        bind: Option<std::net::SocketAddr>,
    },
    /// Print recommendations for one query as JSON
    Recommend { query: String },
    /// Compute Recall@K and AP@K over labeled cases
    Evaluate {
        /// JSON file of cases; the built-in cases are used when omitted
        #[arg(long)]
        cases: Option<PathBuf>,
        #[arg(short, long, default_value_t = evaluation::DEFAULT_K)]
        k: usize,
    },
    /// Ask the generative model for suggestions (needs GEMINI_API_KEY)
    Suggest { query: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(addr) = bind {
                config.bind_addr = addr;
            }
            cmd_serve(config).await
        }
        Command::Recommend { query } => cmd_recommend(&config, &query),
        Command::Evaluate { cases, k } => cmd_evaluate(cases, k),
        Command::Suggest { query } => cmd_suggest(&query).await,
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    Catalog::load(&config.catalog_path, &config.columns)
        .with_context(|| format!("cannot start without a catalog ({})", config.catalog_path.display()))
}

async fn cmd_serve(config: Config) -> Result<()> {
    let catalog = load_catalog(&config)?;
    let state = Arc::new(AppState {
        catalog: CatalogHandle::new(catalog),
        recommender: Recommender::new(config.matching),
        catalog_path: config.catalog_path.clone(),
        columns: config.columns.clone(),
    });
    server::serve(state, config.bind_addr).await
}

fn cmd_recommend(config: &Config, query: &str) -> Result<()> {
    let catalog = load_catalog(config)?;
    let results = Recommender::new(config.matching).recommend(&catalog, query)?;
    let output = json!({ "recommended_assessments": results });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_evaluate(cases_path: Option<PathBuf>, k: usize) -> Result<()> {
    let cases = match cases_path {
        Some(path) => evaluation::load_cases(&path)?,
        None => evaluation::builtin_cases(),
    };
    if cases.is_empty() {
        bail!("no evaluation cases to run");
    }

    let summary = evaluation::evaluate(&cases, k)?;
    let rows: Vec<_> = cases
        .iter()
        .zip(&summary.cases)
        .enumerate()
        .map(|(i, (case, report))| {
            json!({
                "case": i + 1,
                "query": case.query,
                format!("recall@{k}"): round2(report.recall),
                format!("map@{k}"): round2(report.average_precision),
            })
        })
        .collect();
    let output = json!({
        "k": k,
        "cases": rows,
        "average_recall": round2(summary.mean_recall),
        "average_map": round2(summary.mean_average_precision),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn cmd_suggest(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        bail!("usage: recommender suggest <query>");
    }
    let client = GeminiClient::from_env()?;
    let table = generation::suggest(&client, query).await?;
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}
