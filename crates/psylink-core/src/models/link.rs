use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// One single-use test access link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinkRecord {
    pub id: String,
    pub url: String,
    pub questionnaire_type: String,
    pub status: LinkStatus,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LinkStatus {
    Unused,
    Used,
    Expired,
    Disabled,
}

impl LinkStatus {
    pub const ALL: [LinkStatus; 4] = [
        LinkStatus::Unused,
        LinkStatus::Used,
        LinkStatus::Expired,
        LinkStatus::Disabled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Unused => "unused",
            LinkStatus::Used => "used",
            LinkStatus::Expired => "expired",
            LinkStatus::Disabled => "disabled",
        }
    }

    /// Display label used by the dashboard's exported spreadsheets.
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Unused => "未使用",
            LinkStatus::Used => "已使用",
            LinkStatus::Expired => "已过期",
            LinkStatus::Disabled => "已禁用",
        }
    }

    /// Whether an administrator or respondent may move a link from `self` to `next`.
    pub fn can_transition_to(self, next: LinkStatus) -> bool {
        match (self, next) {
            (LinkStatus::Used, _) => false,
            (from, to) if from == to => false,
            (_, LinkStatus::Unused) => false,
            (LinkStatus::Unused, _) => true,
            // Expired or disabled links can still be disabled or expired.
            (_, LinkStatus::Expired | LinkStatus::Disabled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = CoreError;

    /// Accepts the wire literals (any ASCII case) and the display labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LinkStatus::ALL
            .into_iter()
            .find(|status| {
                status.as_str().eq_ignore_ascii_case(trimmed) || status.label() == trimmed
            })
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

impl LinkRecord {
    /// Mint a fresh `unused` link owned by `created_by`.
    pub fn mint(
        base_url: &str,
        questionnaire_type: impl Into<String>,
        created_by: Option<String>,
    ) -> Self {
        let id = new_link_id();
        Self {
            url: link_url(base_url, &id),
            id,
            questionnaire_type: questionnaire_type.into(),
            status: LinkStatus::Unused,
            created_at: jiff::Timestamp::now(),
            used_at: None,
            expired_at: None,
            report_id: None,
            created_by,
        }
    }

    /// Move to `next`, stamping the lifecycle timestamps.
    pub fn transition(&mut self, next: LinkStatus, at: jiff::Timestamp) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        match next {
            LinkStatus::Used => self.used_at = Some(at),
            LinkStatus::Expired => self.expired_at = Some(at),
            LinkStatus::Unused | LinkStatus::Disabled => {}
        }
        self.status = next;
        Ok(())
    }

    /// `usedAt` is present exactly when the link has been used.
    pub fn is_consistent(&self) -> bool {
        self.used_at.is_some() == (self.status == LinkStatus::Used)
    }
}

pub fn new_link_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn link_url(base_url: &str, id: &str) -> String {
    format!("{}/test/{id}", base_url.trim_end_matches('/'))
}

/// The link id encoded in a test url: its last non-empty path segment.
pub fn id_from_url(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let (_, rest) = without_query.split_once("://")?;
    let (_, path) = rest.split_once('/')?;
    path.rsplit('/').find(|segment| !segment.is_empty())
}
