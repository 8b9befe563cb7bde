/// CLI конвейера: очистка, локации, обучение, предсказание

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use house_price::{
    console, DataLoader, Dataset, DatasetCleaner, LocationAssigner, LocationPolicy,
    PipelineConfig, PricePredictor,
};

#[derive(Parser)]
#[command(name = "house-price", version, about = "House price dataset preparation and price model")]
struct Cli {
    /// JSON с настройками конвейера
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Удалить дубликаты и выбросы
    Clean {
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Добавить колонки location и location_score
    Locate {
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = LocationPolicy::Random)]
        policy: LocationPolicy,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Обучить модель и посчитать RMSE
    Train {
        #[arg(long)]
        input: Option<String>,
        /// Записать отчёт модели в JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Интерактивное предсказание цены
    Predict {
        #[arg(long)]
        input: Option<String>,
    },
    /// Очистка, сегментация по цене и обучение подряд
    Run,
}

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Command::Clean { input, output } => {
            let input = input.unwrap_or_else(|| config.raw_file.clone());
            let output = output.unwrap_or_else(|| config.cleaned_file.clone());
            clean(&config, &input, &output)?;
        }
        Command::Locate {
            input,
            output,
            policy,
            seed,
        } => {
            let input = input.unwrap_or_else(|| config.raw_file.clone());
            let output = output.unwrap_or_else(|| match policy {
                LocationPolicy::Random => config.augmented_file.clone(),
                LocationPolicy::PriceRank => config.final_file.clone(),
            });
            let dataset = load(&input)?;
            let assigner = LocationAssigner::new(policy, seed.unwrap_or(config.location_seed));
            locate(&assigner, &dataset, &output)?;
        }
        Command::Train { input, report } => {
            let input = input.unwrap_or_else(|| config.final_file.clone());
            let dataset = load(&input)?;
            let (_, model_report) = PricePredictor::train(&dataset, &config)?;
            if let Some(path) = report {
                model_report
                    .save(&path)
                    .with_context(|| format!("Failed to write report {}", path.display()))?;
                tracing::info!("Model report saved to {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&model_report)?);
        }
        Command::Predict { input } => {
            // Очищенный файл, если он уже есть
            let input = input.unwrap_or_else(|| {
                if Path::new(&config.cleaned_file).exists() {
                    config.cleaned_file.clone()
                } else {
                    config.raw_file.clone()
                }
            });
            tracing::info!("Loading data from: {}", input);
            let dataset = load(&input)?;

            let assigner = LocationAssigner::new(LocationPolicy::PriceRank, config.location_seed);
            let located = locate(&assigner, &dataset, &config.final_file)?;
            let (model, report) = PricePredictor::train(&located, &config)?;

            let stdin = io::stdin();
            console::run_predictor(&model, report.rmse, stdin.lock(), io::stdout())?;
            println!("\nThank you for using the House Price Predictor!");
        }
        Command::Run => {
            let cleaned = clean(&config, &config.raw_file, &config.cleaned_file)?;
            let assigner = LocationAssigner::new(LocationPolicy::PriceRank, config.location_seed);
            let located = locate(&assigner, &cleaned, &config.final_file)?;
            let (_, report) = PricePredictor::train(&located, &config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn load(path: &str) -> anyhow::Result<Dataset> {
    DataLoader::load(path).with_context(|| format!("Failed to load {}", path))
}

fn clean(config: &PipelineConfig, input: &str, output: &str) -> anyhow::Result<Dataset> {
    tracing::info!("--- Cleaning Data: {} ---", input);
    let dataset = load(input)?;
    let (cleaned, _) = DatasetCleaner::from_config(config).clean(&dataset)?;

    DataLoader::save(&cleaned, output).with_context(|| format!("Failed to write {}", output))?;
    tracing::info!("Cleaned data saved to {}", output);
    Ok(cleaned)
}

fn locate(assigner: &LocationAssigner, dataset: &Dataset, output: &str) -> anyhow::Result<Dataset> {
    let located = assigner.assign(dataset)?;

    DataLoader::save(&located, output).with_context(|| format!("Failed to write {}", output))?;
    tracing::info!("Created '{}' ({:?} locations)", output, assigner.policy());
    Ok(located)
}
