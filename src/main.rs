use clap::Parser;
use energy_forecast::adapters::{DialoguerPrompter, InteractiveSource};
use energy_forecast::domain::ports::{AnswerSource, ConfigProvider};
use energy_forecast::utils::error::ErrorSeverity;
use energy_forecast::utils::{logger, validation::Validate};
use energy_forecast::{CliConfig, ForecastEngine, ForecastError, HttpForecastClient, LocalStorage};
use energy_forecast::{Result, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Forecast failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<()> {
    let settings = cli.load_settings()?;
    settings.validate()?;
    tracing::info!("✅ Configuration loaded, API at {}", settings.api_base_url());

    let engine = ForecastEngine::new(HttpForecastClient::from_config(&settings)?);

    if cli.check {
        let status = engine.check().await?;
        println!("✅ Forecast API is {}", status.status);
        return Ok(());
    }

    // 答案檔齊全就不用互動
    let mut source: Box<dyn AnswerSource> = if settings.has_answers() {
        tracing::info!("📄 Using answers from the configuration file");
        Box::new(settings.scripted_source()?)
    } else {
        Box::new(InteractiveSource::new(DialoguerPrompter::new()))
    };
    let preset = settings.location_query()?;

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the request will not be sent");
        let wizard = engine.collect(source.as_mut(), preset).await?;
        let request = wizard.finish()?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let report = engine.run(source.as_mut(), preset).await?;
    println!("{}", report.render_text());

    export(&settings, &report).await
}

async fn export(settings: &TomlConfig, report: &energy_forecast::Report) -> Result<()> {
    let Some(path) = settings.output_path() else {
        return Ok(());
    };

    let storage = LocalStorage::new(path);
    let written = report
        .export(&storage, settings.file_name(), settings.output_formats())
        .await?;
    if written.is_empty() {
        return Err(ForecastError::InvalidConfigValueError {
            field: "output.formats".to_string(),
            value: settings.output_formats().join(","),
            reason: "no report was written".to_string(),
        });
    }
    for file in written {
        println!("📁 Saved {}/{}", path, file);
    }
    Ok(())
}
