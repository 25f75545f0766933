use anyhow::Context;
use clap::{Parser, Subcommand};
use zip_gazetteer::utils::logger;
use zip_gazetteer::utils::validation::{self, Validate};
use zip_gazetteer::{CsvImport, DatasetKind, EtlEngine, FeatureReducer, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "reduce")]
#[command(about = "Reduce boundary datasets and convert the zip gazetteer to JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the input datasets; outputs land next to them
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Optional TOML config file ([data].data_dir is read from it)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// county.json -> county_limited.json
    Counties(PathArgs),
    /// place.json -> place_limited.json
    Places(PathArgs),
    /// state.json -> state_limited.json
    States(PathArgs),
    /// uszips.csv -> uszips.json
    Zips(PathArgs),
    /// Run every reducer with default file names
    All,
}

#[derive(clap::Args)]
struct PathArgs {
    /// Input file, relative to the data directory
    #[arg(long)]
    input: Option<String>,

    /// Output file, relative to the data directory
    #[arg(long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let file_config = args
        .config
        .as_deref()
        .map(TomlConfig::from_file)
        .transpose()
        .context("Failed to load config file")?;
    if let Some(file) = &file_config {
        file.validate()?;
    }

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| file_config.as_ref().and_then(|f| f.data.data_dir.clone()))
        .unwrap_or_else(|| ".".to_string());
    validation::validate_path("data_dir", &data_dir)?;

    tracing::info!("🚀 Reducing datasets in {}", data_dir);
    let storage = LocalStorage::new(data_dir);

    let outputs = match &args.command {
        Command::Counties(paths) => vec![reduce_features(&storage, DatasetKind::Counties, paths).await?],
        Command::Places(paths) => vec![reduce_features(&storage, DatasetKind::Places, paths).await?],
        Command::States(paths) => vec![reduce_features(&storage, DatasetKind::States, paths).await?],
        Command::Zips(paths) => vec![import_zips(&storage, paths).await?],
        Command::All => {
            let defaults = PathArgs {
                input: None,
                output: None,
            };
            let mut outputs = Vec::new();
            for kind in DatasetKind::ALL {
                outputs.push(reduce_features(&storage, kind, &defaults).await?);
            }
            outputs.push(import_zips(&storage, &defaults).await?);
            outputs
        }
    };

    for output in outputs {
        println!("📁 Output saved to: {}", output);
    }
    println!("done");
    Ok(())
}

async fn reduce_features(
    storage: &LocalStorage,
    kind: DatasetKind,
    paths: &PathArgs,
) -> anyhow::Result<String> {
    let input = paths.input.as_deref().unwrap_or(kind.default_input());
    let output = paths.output.as_deref().unwrap_or(kind.default_output());

    let reducer = FeatureReducer::new(storage.clone(), kind).with_paths(input, output);
    EtlEngine::new(reducer)
        .run()
        .await
        .with_context(|| format!("Reducing {} failed", kind.name()))
}

async fn import_zips(storage: &LocalStorage, paths: &PathArgs) -> anyhow::Result<String> {
    let input = paths
        .input
        .as_deref()
        .unwrap_or(CsvImport::<LocalStorage>::DEFAULT_INPUT);
    let output = paths
        .output
        .as_deref()
        .unwrap_or(CsvImport::<LocalStorage>::DEFAULT_OUTPUT);

    let import = CsvImport::new(storage.clone()).with_paths(input, output);
    EtlEngine::new(import)
        .run()
        .await
        .context("Converting the zip CSV failed")
}
