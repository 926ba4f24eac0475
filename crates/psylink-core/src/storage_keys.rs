//! Storage key conventions.
//!
//! Pure string constants. These keep the literal names the dashboard has
//! always written so existing data stays readable.

pub const LINKS: &str = "test_links";

pub const CUSTOM_USERS: &str = "custom_users";

pub const AUDIT_LOGS: &str = "audit_logs";

pub const BACKUPS: &str = "system_backups";

pub const QUESTION_TYPES: &str = "question_import_custom_types";

pub const PUBLISH_STATE: &str = "question_publish_state";

pub const IMPORT_HISTORY: &str = "question_import_history";

pub const IMPORT_TASKS: &str = "question_import_tasks";

pub const ACCOUNTS_QUOTA: &str = "default_accounts_quota";

pub const ACCOUNTS_USED_QUOTA: &str = "default_accounts_used_quota";

pub const ACCOUNTS_TOTAL_QUOTA: &str = "default_accounts_total_quota";

pub const ACCOUNTS_RECHARGE: &str = "default_accounts_recharge";

pub const ACCOUNTS_LOGIN_TIMES: &str = "default_accounts_login_times";

/// Every key the whole-state recovery tooling inspects, exports and checks.
pub const RECOVERY_KEYS: &[&str] = &[
    LINKS,
    CUSTOM_USERS,
    AUDIT_LOGS,
    BACKUPS,
    QUESTION_TYPES,
    PUBLISH_STATE,
    IMPORT_HISTORY,
    ACCOUNTS_QUOTA,
    ACCOUNTS_USED_QUOTA,
    ACCOUNTS_TOTAL_QUOTA,
    ACCOUNTS_RECHARGE,
    ACCOUNTS_LOGIN_TIMES,
];

/// Keys captured by a structured snapshot.
pub const SNAPSHOT_KEYS: &[&str] = &[
    LINKS,
    CUSTOM_USERS,
    QUESTION_TYPES,
    PUBLISH_STATE,
    IMPORT_HISTORY,
    AUDIT_LOGS,
];

/// Returns true if `key` is safe to use as a file name in a directory store.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
