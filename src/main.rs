use ads_bulk::adapters::tabular::write_bulk_csv;
use ads_bulk::domain::model::{BulkRow, ErrorEntry};
use ads_bulk::utils::error::ErrorSeverity;
use ads_bulk::utils::{logger, validation::Validate};
use ads_bulk::{BulkPipeline, CliConfig, EtlEngine, EtlError, LocalStorage, Settings};
use clap::Parser;

const PREVIEW_ROWS: usize = 200;
const LISTED_ISSUES: usize = 50;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.print_default_settings {
        println!("{}", Settings::builtin().to_pretty_json()?);
        return Ok(());
    }

    tracing::info!("Starting ads-bulk");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    // A settings file that is present but malformed stops the run here.
    let settings = match Settings::load(config.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    let preview = config.preview;
    let storage = LocalStorage::new(".".to_string());
    let pipeline = BulkPipeline::new(storage, config, settings);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            if preview {
                print_preview(&report.rows)?;
            }
            list_issues(&report.errors);

            println!(
                "✅ Generated {} bulk rows ({} row issues)",
                report.rows.len(),
                report.errors.len()
            );
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn print_preview(rows: &[BulkRow]) -> Result<(), EtlError> {
    let shown = rows.len().min(PREVIEW_ROWS);
    print!("{}", write_bulk_csv(&rows[..shown])?);
    if rows.len() > shown {
        println!("... {} more rows in the output file", rows.len() - shown);
    }
    println!();
    Ok(())
}

fn list_issues(errors: &[ErrorEntry]) {
    for entry in errors.iter().take(LISTED_ISSUES) {
        tracing::warn!("⚠️ {}", entry);
    }
    if errors.len() > LISTED_ISSUES {
        tracing::warn!(
            "... {} more row issues in the error report",
            errors.len() - LISTED_ISSUES
        );
    }
}

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Bulk generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
