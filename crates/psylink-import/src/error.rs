use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop an import before any row is examined.
///
/// Problems with individual rows never appear here; they are reported in
/// `ImportResult::errors`.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format for {0}: upload a .csv, .xlsx or .xls file")]
    UnsupportedFormat(String),

    #[error("no header row found: the first row must name the columns, e.g. 问卷类型,状态")]
    MissingHeader,

    #[error(
        "none of the columns [{found}] are recognized: include a questionnaire type column \
         such as 问卷类型 or questionnaireType"
    )]
    NoRecognizedColumns { found: String },

    #[error("could not parse CSV: {0}")]
    Csv(String),

    #[error("could not read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("failed to save imported links: {0}")]
    Links(#[from] psylink_links::error::LinkError),

    #[error("storage error: {0}")]
    Storage(#[from] psylink_storage::error::StorageError),

    #[error("import task not found: {0}")]
    TaskNotFound(String),
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Csv(e.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(e: calamine::Error) -> Self {
        ImportError::Spreadsheet(e.to_string())
    }
}
