use anyhow::Context;
use clap::Parser;
use is_in_country::config::Command;
use is_in_country::utils::{logger, validation::Validate};
use is_in_country::{
    BatchRunner, CliConfig, Error, ErrorCategory, FileConfig, IsInCountry, Settings,
    VerificationOutcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::from_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => FileConfig::default(),
    };

    // 初始化日誌
    let level = file.logging.level.clone();
    if cli.json_logs || file.logging.json.unwrap_or(false) {
        logger::init_json_logger(cli.verbose, level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, level.as_deref());
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = file.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(exit_code_for(e.category()));
    }

    let settings = Settings::new(file).with_server_url(cli.server.clone());

    match cli.command {
        Command::Check {
            lat,
            lon,
            country,
            json,
        } => {
            let sdk = IsInCountry::new(
                settings.build_client()?,
                settings.location_source(),
                settings.country_provider(),
            );
            let outcome = sdk.check_coordinate(lat, lon, &country).await;
            finish(outcome, json)
        }
        Command::Here {
            country,
            lat,
            lon,
            json,
        } => {
            let settings = settings.with_device_location(lat, lon);
            let sdk = IsInCountry::new(
                settings.build_client()?,
                settings.location_source(),
                settings.country_provider(),
            );
            let outcome = match country {
                Some(code) => sdk.check_current_location(&code).await,
                None => sdk.check_current_location_in_device_country().await,
            };
            finish(outcome, json)
        }
        Command::Batch {
            input,
            output,
            concurrency,
        } => {
            if settings.server_url().is_none() {
                let e = Error::ServerUrlNotSet;
                eprintln!("❌ {}", e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(exit_code_for(e.category()));
            }

            let runner = BatchRunner::new(settings.build_client()?, concurrency);
            let reader = std::fs::File::open(&input)
                .with_context(|| format!("failed to open {}", input.display()))?;

            let summary = match &output {
                Some(path) => {
                    let writer = std::fs::File::create(path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    runner.run_io(reader, writer).await?
                }
                None => runner.run_io(reader, std::io::stdout()).await?,
            };

            eprintln!(
                "📊 {} checked: {} inside, {} outside, {} failed",
                summary.total, summary.inside, summary.outside, summary.failed
            );
            if let Some(path) = &output {
                eprintln!("📁 Report saved to: {}", path.display());
            }
            Ok(())
        }
    }
}

/// Prints the outcome and exits: 0 inside, 1 outside, 2 and up for failures.
fn finish(outcome: VerificationOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    let code = match &outcome {
        VerificationOutcome::Verified(v) => {
            if !json {
                let verdict = if v.is_inside { "✅ Inside" } else { "❌ Outside" };
                println!("{}\n{}", verdict, v.summary());
            }
            if v.is_inside {
                0
            } else {
                1
            }
        }
        VerificationOutcome::Failed(f) => {
            if !json {
                eprintln!("❌ {} ({})", f.reason, f.category);
            }
            exit_code_for(f.category)
        }
    };

    std::process::exit(code)
}

fn exit_code_for(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::ConfigurationError => 2,
        ErrorCategory::NetworkError => 3,
        ErrorCategory::ServerError => 4,
        ErrorCategory::ParseError => 5,
    }
}
