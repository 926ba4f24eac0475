use std::path::PathBuf;

use psylink_core::models::audit::TargetType;
use psylink_core::models::import::ImportResult;
use psylink_import::template::{TEMPLATE_FILE_NAME, generate_template};
use psylink_import::ImportFile;
use serde_json::json;

use crate::cli::{ImportArgs, LinksCommand};
use crate::context::AppContext;
use crate::output;

pub async fn run(ctx: &AppContext, command: LinksCommand) -> eyre::Result<()> {
    match command {
        LinksCommand::Import(args) => import(ctx, args).await,
        LinksCommand::Template { out } => template(out),
        LinksCommand::List { status } => {
            let links: Vec<_> = ctx
                .links
                .load()
                .into_iter()
                .filter(|link| status.is_none_or(|s| link.status == s))
                .collect();
            if ctx.json {
                return output::print_json(&links);
            }
            for link in &links {
                println!(
                    "{}  {:<10} {:<8} {}  {}",
                    link.id,
                    link.questionnaire_type,
                    link.status.as_str(),
                    output::short_time(link.created_at),
                    link.url
                );
            }
            println!("{} link(s)", links.len());
            Ok(())
        }
        LinksCommand::Generate {
            questionnaire_type,
            quantity,
        } => {
            let minted = ctx
                .links
                .add_links(&questionnaire_type, quantity, Some(ctx.actor.as_str()))?;
            ctx.audit(
                "generate_links",
                &questionnaire_type,
                TargetType::Link,
                json!({ "quantity": minted.len() }),
            );
            if ctx.json {
                return output::print_json(&minted);
            }
            for link in &minted {
                println!("{}", link.url);
            }
            Ok(())
        }
        LinksCommand::Use { id, report_id } => {
            if !ctx.links.use_link(&id, report_id.as_deref())? {
                return Err(match ctx.links.get(&id) {
                    Some(link) => eyre::eyre!("link {id} is {} and cannot be used", link.status),
                    None => eyre::eyre!("link not found: {id}"),
                });
            }
            ctx.audit("use_link", &id, TargetType::Link, json!({ "reportId": report_id }));
            println!("link {id} marked as used");
            Ok(())
        }
        LinksCommand::SetStatus {
            id,
            status,
            report_id,
        } => {
            let updated = ctx
                .links
                .update_status(&id, status, report_id.as_deref())?;
            ctx.audit(
                "update_link_status",
                &id,
                TargetType::Link,
                json!({ "status": status.as_str() }),
            );
            if ctx.json {
                return output::print_json(&updated);
            }
            println!("link {id} is now {}", updated.status);
            Ok(())
        }
        LinksCommand::Delete { id } => {
            if !ctx.links.delete(&id)? {
                return Err(eyre::eyre!("link not found: {id}"));
            }
            ctx.audit("delete_link", &id, TargetType::Link, json!({}));
            println!("link {id} deleted");
            Ok(())
        }
    }
}

async fn import(ctx: &AppContext, args: ImportArgs) -> eyre::Result<()> {
    let file = ImportFile::read(&args.file).await?;
    let owner = args.owner.as_deref().unwrap_or(ctx.actor.as_str());

    let task = ctx.tasks.create(&file.name, file.size(), 0)?;
    ctx.tasks.start(&task.id)?;

    // Progress is persisted in 10% steps to keep writes bounded.
    let mut last_step = 0;
    let outcome = ctx.pipeline.run_with_progress(&file, Some(owner), |progress| {
        let step = progress.percent() / 10;
        if step > last_step {
            last_step = step;
            if let Err(e) = ctx.tasks.set_progress(&task.id, step * 10) {
                tracing::warn!(task = %task.id, error = %e, "failed to record import progress");
            }
        }
    });

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            ctx.tasks.fail(&task.id, &e.to_string())?;
            return Err(e.into());
        }
    };
    ctx.tasks
        .complete(&task.id, result.total(), result.success, 0)?;
    ctx.audit(
        "import_links",
        &file.name,
        TargetType::Link,
        json!({ "success": result.success, "failed": result.failed, "task": task.id }),
    );

    if ctx.json {
        return output::print_json(&result);
    }
    print_summary(&file.name, &result);
    Ok(())
}

fn print_summary(file_name: &str, result: &ImportResult) {
    println!(
        "{file_name}: {} imported, {} failed ({} rows)",
        result.success,
        result.failed,
        result.total()
    );
    for error in &result.errors {
        println!("  row {}: {}", error.row, error.message);
    }
}

fn template(out: Option<PathBuf>) -> eyre::Result<()> {
    let path = out.unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME));
    output::write_file(&path, &generate_template()?)?;
    println!("{}", path.display());
    Ok(())
}
