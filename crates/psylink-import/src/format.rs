use std::path::Path;

use crate::error::ImportError;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const OLE_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Comma-separated text.
    Delimited,
    /// Legacy `.xls`, modern `.xlsx`/`.xlsm`/`.xlsb`, or `.ods`.
    Spreadsheet,
}

/// Decide how to read an upload: by extension first, then by content.
pub fn detect(file_name: &str, bytes: &[u8]) -> Result<InputKind, ImportError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv" | "txt") => return Ok(InputKind::Delimited),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => return Ok(InputKind::Spreadsheet),
        _ => {}
    }

    if bytes.starts_with(&ZIP_MAGIC) || bytes.starts_with(&OLE_MAGIC) {
        return Ok(InputKind::Spreadsheet);
    }
    if std::str::from_utf8(bytes).is_ok() {
        return Ok(InputKind::Delimited);
    }
    Err(ImportError::UnsupportedFormat(file_name.to_string()))
}
