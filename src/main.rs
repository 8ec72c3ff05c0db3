use clap::Parser;
use score_query::domain::ports::ConfigProvider;
use score_query::utils::logger::{self, LogFormat};
use score_query::utils::validation::Validate;
use score_query::{
    CliConfig, CsvStore, EspnSource, ScoreEngine, Session, Settings, SystemClock, TeamMatcher,
    TomlConfig,
};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config, settings));
    // a stdin read left pending by Ctrl-C must not keep the process alive
    runtime.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = result {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
    Ok(())
}

fn load_settings(config: &CliConfig) -> score_query::Result<Settings> {
    let mut settings = match &config.config {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            Settings::from_toml(&file)
        }
        None => Settings::default(),
    };
    settings.apply_cli(config);
    settings.validate()?;
    Ok(settings)
}

async fn run(config: CliConfig, settings: Settings) -> score_query::Result<()> {
    let source = EspnSource::from_config(&settings)?;
    let sink = CsvStore::new(settings.csv_path());
    let engine = ScoreEngine::new(source, sink, TeamMatcher::new(settings.match_threshold()));
    let session = Session::new(engine, SystemClock);

    let mut stdout = std::io::stdout();
    if config.query.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        session.run_interactive(stdin, &mut stdout).await
    } else {
        session.run_once(&config.query.join(" "), &mut stdout).await
    }
}
