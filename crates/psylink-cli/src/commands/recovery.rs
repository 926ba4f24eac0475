use std::path::PathBuf;

use psylink_core::models::audit::TargetType;
use serde_json::json;

use crate::cli::RecoveryCommand;
use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext, command: RecoveryCommand) -> eyre::Result<()> {
    match command {
        RecoveryCommand::Check => {
            let reports = ctx.recovery.check_all_data();
            if ctx.json {
                return output::print_json(&reports);
            }
            for report in &reports {
                let state = match (&report.error, report.exists) {
                    (Some(error), _) => format!("error: {error}"),
                    (None, true) => "ok".to_string(),
                    (None, false) => "missing".to_string(),
                };
                let items = report
                    .item_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<32} {:>9} {:>7}  {state}", report.key, report.size, items);
            }
            Ok(())
        }
        RecoveryCommand::Report => output::print_json(&ctx.recovery.data_report()),
        RecoveryCommand::Export { out } => {
            let document = ctx.recovery.export_all_data()?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "psylink-data-{}.json",
                    jiff::Timestamp::now().strftime("%Y-%m-%d")
                ))
            });
            output::write_file(&path, document.as_bytes())?;
            println!("{}", path.display());
            Ok(())
        }
        RecoveryCommand::Import { file } => {
            let contents = tokio::fs::read(&file)
                .await
                .map_err(|e| eyre::eyre!("failed to read {}: {e}", file.display()))?;
            let outcome = ctx.recovery.import_all_data(&contents);
            ctx.audit(
                "import_all_data",
                &file.display().to_string(),
                TargetType::System,
                json!({
                    "success": outcome.success,
                    "imported": outcome.imported.len(),
                    "failed": outcome.failures.len(),
                }),
            );
            if ctx.json {
                output::print_json(&outcome)?;
            } else {
                println!("{}", outcome.message);
            }
            if !outcome.success {
                return Err(eyre::eyre!("state import rejected: {}", outcome.message));
            }
            if !outcome.failures.is_empty() {
                return Err(eyre::eyre!("state import incomplete: {}", outcome.message));
            }
            Ok(())
        }
    }
}
