use anyhow::{Context, Result};
use clap::Parser;
use medcost_rs::config::AppConfig;
use medcost_rs::trainer::Trainer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "medcost-train",
    version,
    about = "Fit the insurance cost model and write the artifact"
)]
struct Cli {
    /// Configuration file (defaults to ./medcost.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training CSV
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(short, long)]
    artifact: Option<PathBuf>,

    /// Number of trees
    #[arg(long)]
    trees: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.dataset = dataset;
    }
    if let Some(artifact) = cli.artifact {
        config.artifact = artifact;
    }
    if let Some(trees) = cli.trees {
        config.forest.n_estimators = trees;
    }
    if let Some(seed) = cli.seed {
        config.forest.seed = seed;
    }

    let report = Trainer::from_config(&config)
        .run()
        .with_context(|| format!("training on {} failed", config.dataset.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
