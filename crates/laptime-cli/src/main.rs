use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use laptime_cli::args::LapArgs;
use laptime_cli::commands::encode::handle_encode;
use laptime_cli::commands::model_info::handle_model_info;
use laptime_cli::commands::predict::{handle_predict, PredictTarget};
use laptime_cli::output::OutputFormat;

const DEFAULT_MODEL_PATH: &str = "models/lap_time_model.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "F1 lap time prediction utilities")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict the lap time for a lap, locally or through a running service.
    Predict {
        /// Model artifact used for local predictions.
        #[arg(long, env = "LAPTIME_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Base URL of a running service; takes precedence over --model.
        #[arg(long)]
        api_url: Option<String>,

        #[command(flatten)]
        lap: LapArgs,
    },
    /// Print the feature vector for a lap. No model is needed.
    Encode {
        #[command(flatten)]
        lap: LapArgs,
    },
    /// Load a model artifact and print its metadata.
    ModelInfo {
        /// Model artifact to inspect.
        #[arg(long, env = "LAPTIME_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Predict {
            model,
            api_url,
            lap,
        } => {
            let target = match api_url.as_deref() {
                Some(url) => PredictTarget::Remote(url),
                None => PredictTarget::Local(&model),
            };
            handle_predict(target, &lap.into(), cli.format)
        }
        Command::Encode { lap } => handle_encode(&lap.into(), cli.format),
        Command::ModelInfo { model } => handle_model_info(&model, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to initialize logging: {e}");
    }
}
