use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medcost_rs::config::AppConfig;
use medcost_rs::predictor::{ModelHandle, Predictor};
use medcost_rs::preprocessing::{Applicant, Region, Sex, Smoker};
use medcost_rs::CostModel;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "medcost-predict",
    version,
    about = "Estimate medical insurance cost with a trained model"
)]
struct Cli {
    /// Configuration file (defaults to ./medcost.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model artifact to load
    #[arg(short, long, global = true)]
    artifact: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive form (default)
    Form,

    /// Print a single estimate and exit
    Quote {
        #[arg(long, default_value_t = 30)]
        age: u32,
        #[arg(long, default_value = "male")]
        sex: Sex,
        #[arg(long, default_value_t = 25.0)]
        bmi: f64,
        #[arg(long, default_value_t = 0)]
        children: u32,
        #[arg(long, default_value = "no")]
        smoker: Smoker,
        #[arg(long, default_value = "southwest")]
        region: Region,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = AppConfig::resolve(cli.config.as_deref())?;
    if let Some(artifact) = cli.artifact {
        config.artifact = artifact;
    }
    let handle = ModelHandle::<CostModel>::new(&config.artifact);

    match cli.command.unwrap_or(Command::Form) {
        Command::Form => medcost_rs::ui::run(&handle),
        Command::Quote {
            age,
            sex,
            bmi,
            children,
            smoker,
            region,
            json,
        } => {
            let requested = Applicant {
                age,
                sex,
                bmi,
                children,
                smoker,
                region,
            };
            let applicant = requested.clamped();
            if applicant != requested {
                log::warn!("inputs clamped to the accepted ranges: {applicant:?}");
            }

            log::debug!("loading model from {}", handle.path().display());
            let predictor = Predictor::from_handle(&handle)?;
            let quote = predictor
                .quote(&applicant)
                .context("prediction failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("{quote}");
            }
            Ok(())
        }
    }
}
