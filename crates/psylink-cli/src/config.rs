use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsylinkConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub data_dir: PathBuf,
    pub base_url: String,
    /// Snapshots kept. Added in v1.
    pub backup_capacity: usize,
    /// Import tasks kept. Added in v1.
    pub task_capacity: usize,
    pub created_at: jiff::Timestamp,
}

impl PsylinkConfig {
    pub fn defaults() -> eyre::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| eyre::eyre!("no data directory found; pass --data-dir"))?
            .join("psylink");
        Ok(Self::with_data_dir(data_dir))
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            data_dir,
            base_url: DEFAULT_BASE_URL.to_string(),
            backup_capacity: psylink_backup::DEFAULT_CAPACITY,
            task_capacity: psylink_import::tasks::DEFAULT_TASK_CAPACITY,
            created_at: jiff::Timestamp::now(),
        }
    }
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("psylink").join("config.json"))
}

/// The config file if present, else defaults, then command-line overrides.
pub fn resolve(cli: &Cli) -> eyre::Result<PsylinkConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = if path.exists() {
        load_config(&path)?
    } else {
        match &cli.data_dir {
            Some(dir) => PsylinkConfig::with_data_dir(dir.clone()),
            None => PsylinkConfig::defaults()?,
        }
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> eyre::Result<PsylinkConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: PsylinkConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update psylink."
        ));
    }

    // v0 → v1: retention limits became configurable
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("backup_capacity")
            .or_insert(psylink_backup::DEFAULT_CAPACITY.into());
        obj.entry("task_capacity")
            .or_insert(psylink_import::tasks::DEFAULT_TASK_CAPACITY.into());
        obj.entry("base_url")
            .or_insert(DEFAULT_BASE_URL.into());
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added retention limits)");
    }

    Ok(json)
}

pub fn save_config(config: &PsylinkConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
