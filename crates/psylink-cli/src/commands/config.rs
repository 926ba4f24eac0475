use std::path::Path;

use crate::cli::ConfigCommand;
use crate::config::{self, PsylinkConfig};
use crate::output;

pub fn run(
    config: &PsylinkConfig,
    path: Option<&Path>,
    command: ConfigCommand,
    json: bool,
) -> eyre::Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::default_config_path()?,
    };
    match command {
        ConfigCommand::Show => {
            if json {
                return output::print_json(config);
            }
            println!("config file:     {}", path.display());
            println!("data dir:        {}", config.data_dir.display());
            println!("base url:        {}", config.base_url);
            println!("backup capacity: {}", config.backup_capacity);
            println!("task capacity:   {}", config.task_capacity);
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(eyre::eyre!(
                    "config already exists at {}; pass --force to overwrite",
                    path.display()
                ));
            }
            config::save_config(config, &path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
