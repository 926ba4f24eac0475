use std::path::PathBuf;

use psylink_backup::SnapshotStore;
use psylink_backup::error::BackupError;
use psylink_core::models::audit::TargetType;
use serde_json::json;

use crate::cli::BackupCommand;
use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext, command: BackupCommand) -> eyre::Result<()> {
    match command {
        BackupCommand::Create { name, description } => {
            let snapshot = ctx.backups.create(&name, description.as_deref())?;
            ctx.audit(
                "create_backup",
                &snapshot.id,
                TargetType::System,
                json!({ "name": snapshot.name, "size": snapshot.size }),
            );
            if ctx.json {
                return output::print_json(&snapshot);
            }
            println!("{}", snapshot.id);
            Ok(())
        }
        BackupCommand::List => {
            let snapshots = ctx.backups.list();
            if ctx.json {
                return output::print_json(&snapshots);
            }
            for snapshot in &snapshots {
                println!(
                    "{}  {}  {:>9}  {}",
                    snapshot.id,
                    output::short_time(snapshot.timestamp),
                    snapshot.size,
                    snapshot.name
                );
            }
            println!("{} of {} backup(s)", snapshots.len(), ctx.backups.capacity());
            Ok(())
        }
        BackupCommand::Show { id } => {
            let snapshot = ctx
                .backups
                .get(&id)
                .ok_or(BackupError::NotFound(id))?;
            output::print_json(&snapshot)
        }
        BackupCommand::Restore { id } => {
            let outcome = ctx.backups.restore(&id);
            ctx.audit(
                "restore_backup",
                &id,
                TargetType::System,
                json!({ "success": outcome.success, "message": outcome.message }),
            );
            if ctx.json {
                output::print_json(&outcome)?;
            }
            if !outcome.success {
                return Err(eyre::eyre!(outcome.message));
            }
            if !ctx.json {
                println!("{}", outcome.message);
            }
            Ok(())
        }
        BackupCommand::Delete { id } => {
            if !ctx.backups.delete(&id)? {
                return Err(BackupError::NotFound(id).into());
            }
            ctx.audit("delete_backup", &id, TargetType::System, json!({}));
            println!("backup {id} deleted");
            Ok(())
        }
        BackupCommand::Export { id, out } => {
            let snapshot = ctx
                .backups
                .get(&id)
                .ok_or(BackupError::NotFound(id))?;
            let file = SnapshotStore::export_as_file(&snapshot)?;
            let path = out.unwrap_or_default().join(&file.file_name);
            output::write_file(&path, file.contents.as_bytes())?;
            println!("{}", path.display());
            Ok(())
        }
        BackupCommand::Import { file } => import(ctx, file).await,
    }
}

async fn import(ctx: &AppContext, path: PathBuf) -> eyre::Result<()> {
    let contents = tokio::fs::read(&path)
        .await
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    let snapshot = ctx.backups.import_from_file(&contents)?;
    ctx.audit(
        "import_backup",
        &snapshot.id,
        TargetType::System,
        json!({ "name": snapshot.name, "file": path.display().to_string() }),
    );
    if ctx.json {
        return output::print_json(&snapshot);
    }
    println!("imported backup {} ({})", snapshot.id, snapshot.name);
    Ok(())
}
