use crate::cli::TasksCommand;
use crate::context::AppContext;
use crate::output;

pub fn run(ctx: &AppContext, command: TasksCommand) -> eyre::Result<()> {
    match command {
        TasksCommand::List => {
            let tasks = ctx.tasks.load();
            if ctx.json {
                return output::print_json(&tasks);
            }
            for task in &tasks {
                println!(
                    "{}  {}  {:<10} {:>3}%  {} added  {}",
                    task.id,
                    output::short_time(task.created_at),
                    output::label(&task.status),
                    task.progress,
                    task.added,
                    task.error.as_deref().unwrap_or(&task.file_name)
                );
            }
            Ok(())
        }
    }
}
