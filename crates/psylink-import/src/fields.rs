use std::collections::HashMap;

use crate::error::ImportError;

/// Logical columns of a link import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkField {
    QuestionnaireType,
    Url,
    Status,
    CreatedAt,
    UsedAt,
    ExpiredAt,
    ReportId,
}

impl LinkField {
    pub const ALL: [LinkField; 7] = [
        LinkField::QuestionnaireType,
        LinkField::Url,
        LinkField::Status,
        LinkField::CreatedAt,
        LinkField::UsedAt,
        LinkField::ExpiredAt,
        LinkField::ReportId,
    ];

    /// Logical field name, as used in the link JSON.
    pub fn name(self) -> &'static str {
        match self {
            LinkField::QuestionnaireType => "questionnaireType",
            LinkField::Url => "url",
            LinkField::Status => "status",
            LinkField::CreatedAt => "createdAt",
            LinkField::UsedAt => "usedAt",
            LinkField::ExpiredAt => "expiredAt",
            LinkField::ReportId => "reportId",
        }
    }

    /// Header spellings that resolve to this field, compared after
    /// [`normalize_header`]. The first entry is the template header.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LinkField::QuestionnaireType => &[
                "问卷类型",
                "问卷",
                "questionnairetype",
                "questionnaire",
                "type",
            ],
            LinkField::Url => &["链接", "url", "link"],
            LinkField::Status => &["状态", "status"],
            LinkField::CreatedAt => &["创建时间", "createdat"],
            LinkField::UsedAt => &["使用时间", "usedat"],
            LinkField::ExpiredAt => &["过期时间", "expiredat"],
            LinkField::ReportId => &["报告id", "reportid"],
        }
    }

    pub fn template_header(self) -> &'static str {
        match self {
            LinkField::ReportId => "报告ID",
            other => other.aliases()[0],
        }
    }

    pub fn from_header(header: &str) -> Option<LinkField> {
        let normalized = normalize_header(header);
        LinkField::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&normalized.as_str()))
    }
}

/// Lowercase, drop a BOM and any whitespace, `_` or `-`, so `Created At`,
/// `created_at` and `createdAt` all compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolved header row: which column(s) feed each logical field.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    columns: HashMap<LinkField, Vec<usize>>,
    ignored: Vec<String>,
}

impl HeaderMap {
    pub fn resolve(headers: &[String]) -> Result<Self, ImportError> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut columns: HashMap<LinkField, Vec<usize>> = HashMap::new();
        let mut ignored = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            match LinkField::from_header(header) {
                Some(field) => columns.entry(field).or_default().push(index),
                None if header.trim().is_empty() => {}
                None => ignored.push(header.trim().to_string()),
            }
        }

        if columns.is_empty() {
            return Err(ImportError::NoRecognizedColumns {
                found: headers
                    .iter()
                    .map(|h| h.trim())
                    .filter(|h| !h.is_empty())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        if !ignored.is_empty() {
            tracing::debug!(?ignored, "unrecognized import columns ignored");
        }
        Ok(Self { columns, ignored })
    }

    pub fn has(&self, field: LinkField) -> bool {
        self.columns.contains_key(&field)
    }

    /// First non-blank value for `field` in `row`, trimmed.
    pub fn get<'a>(&self, row: &'a [String], field: LinkField) -> Option<&'a str> {
        self.columns.get(&field)?.iter().find_map(|&index| {
            row.get(index)
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
        })
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}
