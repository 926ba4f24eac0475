use std::collections::HashSet;
use std::path::Path;

use psylink_core::models::import::{ImportResult, RowError};
use psylink_links::LinkStore;

use crate::error::ImportError;
use crate::fields::HeaderMap;
use crate::reader;
use crate::validate::{RowContext, validate_row};

/// An uploaded file: its name (used for format detection) and contents.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
}

impl ImportProgress {
    /// 0–100; an empty file counts as done.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed * 100 / self.total).min(100) as u8
    }
}

/// Parse → validate each row → append accepted links.
#[derive(Clone)]
pub struct ImportPipeline {
    links: LinkStore,
}

impl ImportPipeline {
    pub fn new(links: LinkStore) -> Self {
        Self { links }
    }

    pub fn run(&self, file: &ImportFile, owner: Option<&str>) -> Result<ImportResult, ImportError> {
        self.run_with_progress(file, owner, |_| {})
    }

    /// Import `file`, calling `on_progress` after every data row.
    ///
    /// Returns `Err` only when no row could be examined at all (unreadable
    /// file, no header, no recognized column) or the stored links cannot be
    /// read; nothing is written then.
    pub fn run_with_progress(
        &self,
        file: &ImportFile,
        owner: Option<&str>,
        mut on_progress: impl FnMut(ImportProgress),
    ) -> Result<ImportResult, ImportError> {
        let table = reader::read(&file.name, &file.bytes)?;
        let headers = HeaderMap::resolve(&table.headers)?;

        let mut known_ids: HashSet<String> = self.links.ids()?;
        let ctx = RowContext {
            base_url: self.links.base_url(),
            owner,
            now: jiff::Timestamp::now(),
        };

        let total = table.rows.len();
        let mut accepted = Vec::new();
        let mut result = ImportResult::default();

        for (index, raw) in table.rows.iter().enumerate() {
            let row_number = raw.row;
            let outcome = raw
                .cells
                .clone()
                .and_then(|cells| validate_row(&headers, &cells, &ctx))
                .and_then(|link| {
                    if known_ids.insert(link.id.clone()) {
                        Ok(link)
                    } else {
                        Err(format!("duplicate link id '{}'", link.id))
                    }
                });

            match outcome {
                Ok(link) => {
                    accepted.push(link);
                    result.success += 1;
                }
                Err(message) => {
                    tracing::debug!(row = row_number, %message, "import row rejected");
                    result.failed += 1;
                    result.errors.push(RowError {
                        row: row_number,
                        message,
                    });
                }
            }

            on_progress(ImportProgress {
                processed: index + 1,
                total,
            });
        }

        self.links.append(&accepted)?;

        tracing::info!(
            file = %file.name,
            success = result.success,
            failed = result.failed,
            "link import finished"
        );
        Ok(result)
    }
}
