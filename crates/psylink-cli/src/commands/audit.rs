use psylink_audit::AuditQuery;

use crate::cli::AuditCommand;
use crate::context::AppContext;
use crate::output;

pub fn run(ctx: &AppContext, command: AuditCommand) -> eyre::Result<()> {
    match command {
        AuditCommand::List { limit, action } => {
            let entries = ctx.audit.query(&AuditQuery {
                action,
                limit: Some(limit),
                ..AuditQuery::default()
            });
            if ctx.json {
                return output::print_json(&entries);
            }
            for entry in &entries {
                println!(
                    "{}  {:<12} {:<20} {:<8} {}",
                    output::short_time(entry.timestamp),
                    entry.username,
                    entry.action,
                    output::label(&entry.target_type),
                    entry.target
                );
            }
            Ok(())
        }
    }
}
