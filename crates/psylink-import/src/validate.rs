use jiff::Timestamp;
use psylink_core::models::link::{LinkRecord, LinkStatus, id_from_url, link_url, new_link_id};
use psylink_core::time::parse_timestamp;

use crate::fields::{HeaderMap, LinkField};

/// Per-import values every row shares.
#[derive(Debug, Clone)]
pub struct RowContext<'a> {
    pub base_url: &'a str,
    pub owner: Option<&'a str>,
    /// Default for `createdAt` and for lifecycle stamps a row leaves out.
    pub now: Timestamp,
}

/// Turn one data row into a link, or explain everything wrong with it in a
/// single message.
pub fn validate_row(
    headers: &HeaderMap,
    row: &[String],
    ctx: &RowContext<'_>,
) -> Result<LinkRecord, String> {
    let mut problems = Vec::new();

    let questionnaire_type = headers.get(row, LinkField::QuestionnaireType);
    if questionnaire_type.is_none() {
        problems.push("missing questionnaire type".to_string());
    }

    let status = match headers.get(row, LinkField::Status) {
        None => Some(LinkStatus::Unused),
        Some(raw) => match raw.parse::<LinkStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                problems.push(e.to_string());
                None
            }
        },
    };

    let mut timestamp = |field: LinkField| {
        let raw = headers.get(row, field)?;
        match parse_timestamp(raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                problems.push(format!("{}: {e}", field.name()));
                None
            }
        }
    };
    let created_at = timestamp(LinkField::CreatedAt);
    let mut used_at = timestamp(LinkField::UsedAt);
    let mut expired_at = timestamp(LinkField::ExpiredAt);

    let report_id = headers.get(row, LinkField::ReportId);

    let address = match headers.get(row, LinkField::Url) {
        None => {
            let id = new_link_id();
            let url = link_url(ctx.base_url, &id);
            Some((id, url))
        }
        Some(url) => match parse_link_url(url) {
            Ok(id) => Some((id.to_string(), url.to_string())),
            Err(message) => {
                problems.push(message);
                None
            }
        },
    };

    if let Some(status) = status {
        if used_at.is_some() && status != LinkStatus::Used {
            problems.push(format!("usedAt is only allowed for used links (status is {status})"));
        }
        if expired_at.is_some() && status != LinkStatus::Expired {
            problems.push(format!(
                "expiredAt is only allowed for expired links (status is {status})"
            ));
        }
        if report_id.is_some() && status != LinkStatus::Used {
            problems.push(format!("reportId is only allowed for used links (status is {status})"));
        }
        match status {
            LinkStatus::Used => {
                used_at.get_or_insert(ctx.now);
            }
            LinkStatus::Expired => {
                expired_at.get_or_insert(ctx.now);
            }
            LinkStatus::Unused | LinkStatus::Disabled => {}
        }
    }

    match (problems.is_empty(), questionnaire_type, status, address) {
        (true, Some(questionnaire_type), Some(status), Some((id, url))) => Ok(LinkRecord {
            id,
            url,
            questionnaire_type: questionnaire_type.to_string(),
            status,
            created_at: created_at.unwrap_or(ctx.now),
            used_at,
            expired_at,
            report_id: report_id.map(str::to_string),
            created_by: ctx.owner.map(str::to_string),
        }),
        _ => Err(problems.join("; ")),
    }
}

/// A supplied link must be an absolute http(s) address ending in the link id.
fn parse_link_url(url: &str) -> Result<&str, String> {
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(format!("invalid link '{url}': must start with http:// or https://"));
    }
    id_from_url(url).ok_or_else(|| format!("invalid link '{url}': no link id in the path"))
}
