//! psylink-import
//!
//! Batch link import: reads a CSV or spreadsheet, validates every row on its
//! own, appends the accepted links in one write and reports the rest by row.

pub mod error;
pub mod fields;
pub mod format;
pub mod pipeline;
pub mod reader;
pub mod tasks;
pub mod template;
pub mod validate;

pub use pipeline::{ImportFile, ImportPipeline, ImportProgress};
pub use tasks::TaskQueue;
