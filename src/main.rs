use clap::Parser;
use zip_gazetteer::utils::error::GazetteerError;
use zip_gazetteer::utils::logger;
use zip_gazetteer::utils::validation::{self, Validate};
use zip_gazetteer::{
    resolve_city, resolve_zip, write_zip_lookup, CliConfig, LocalStorage, TomlConfig, ZipDirectory,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 設定檔在日誌之前載入，因為它決定日誌格式
    let file_config = match config.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(file_config) => file_config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    match &file_config {
        Some(file) if file.json_logging() => {
            logger::init_json_logger(file.logging.level.as_deref().unwrap_or("info"))
        }
        _ => logger::init_cli_logger(config.verbose),
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(&config, file_config.as_ref()).await {
        tracing::error!(
            "❌ Query failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(config: &CliConfig, file_config: Option<&TomlConfig>) -> Result<(), GazetteerError> {
    // 驗證配置
    config.validate()?;
    if let Some(file) = file_config {
        file.validate()?;
    }
    let settings = config.settings(file_config);
    settings.validate()?;

    let storage = LocalStorage::new(String::new());
    let directory = ZipDirectory::load(&storage, &settings.zips_path, settings.load_options).await?;

    let mut out = std::io::stdout().lock();

    if let Some(zip) = &config.zip {
        let city_state = resolve_zip(&directory, zip)?;
        write_zip_lookup(&mut out, zip, &city_state)?;
        return Ok(());
    }

    let city = validation::validate_required_field("city", &config.city)?.as_str();
    let report = resolve_city(&directory, city, config.state.as_deref(), settings.top_n, settings.policy)?;
    report.write_to(&mut out)?;

    Ok(())
}
