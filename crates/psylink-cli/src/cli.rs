use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use psylink_core::models::link::LinkStatus;

#[derive(Parser)]
#[command(
    name = "psylink",
    version,
    about = "Assessment link administration: batch import, backups and data recovery",
    long_about = "Manage the assessment links, snapshots and persisted state of a psylink \
                  dashboard. State lives in a data directory, one JSON file per storage key."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: <config dir>/psylink/config.json)
    #[arg(long, global = true, env = "PSYLINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory, overriding the config file
    #[arg(long, global = true, env = "PSYLINK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base url new links are minted under, overriding the config file
    #[arg(long, global = true, env = "PSYLINK_BASE_URL")]
    pub base_url: Option<String>,

    /// User id recorded in the audit log
    #[arg(long, global = true, env = "PSYLINK_ACTOR", default_value = "admin")]
    pub actor: String,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assessment links: batch import and single-link operations
    #[command(subcommand)]
    Links(LinksCommand),
    /// Named snapshots of the persisted collections
    #[command(subcommand)]
    Backup(BackupCommand),
    /// Whole-state health check, export and import
    #[command(subcommand)]
    Recovery(RecoveryCommand),
    /// Import task history
    #[command(subcommand)]
    Tasks(TasksCommand),
    /// Operation log
    #[command(subcommand)]
    Audit(AuditCommand),
    /// Show or write the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
pub enum LinksCommand {
    /// Import links from a CSV or spreadsheet file
    Import(ImportArgs),
    /// Write a fill-in import template
    Template {
        /// Output path (default: the template file name in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List links
    List {
        /// Only links with this status (unused, used, expired, disabled)
        #[arg(long)]
        status: Option<LinkStatus>,
    },
    /// Mint new unused links for a questionnaire type
    Generate {
        questionnaire_type: String,
        #[arg(long, default_value_t = 1)]
        quantity: usize,
    },
    /// Mark an unused link as used
    Use {
        id: String,
        #[arg(long)]
        report_id: Option<String>,
    },
    /// Change a link's status
    SetStatus {
        id: String,
        status: LinkStatus,
        #[arg(long)]
        report_id: Option<String>,
    },
    /// Delete a link
    Delete { id: String },
}

#[derive(Args)]
pub struct ImportArgs {
    /// .csv, .xlsx or .xls file
    pub file: PathBuf,

    /// Owner recorded on every imported link (default: the actor)
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Snapshot the current state
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List snapshots, newest first
    List,
    /// Print one snapshot
    Show { id: String },
    /// Overwrite the live collections with a snapshot
    Restore { id: String },
    /// Delete a snapshot
    Delete { id: String },
    /// Write a snapshot to a backup file
    Export {
        id: String,
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Add a snapshot from a backup file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum RecoveryCommand {
    /// Check every tracked key
    Check,
    /// Check every tracked key and summarize
    Report,
    /// Export every tracked key to one document
    Export {
        /// Output path (default: psylink-data-<date>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write every key of an exported document back
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum TasksCommand {
    /// List import tasks, newest first
    List,
}

#[derive(Subcommand)]
pub enum AuditCommand {
    /// List operation log entries, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Only entries whose action contains this text
        #[arg(long)]
        action: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}
