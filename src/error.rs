//! Error types for the xl2csv library.

use std::io;
use thiserror::Error;

/// Result type alias for xl2csv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during workbook loading and CSV export.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a ZIP archive at all.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The input is a ZIP archive but not an Excel workbook.
    #[error("Not an Excel workbook: {0}")]
    NotAWorkbook(String),

    /// Error reading the workbook's ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required workbook part is missing from the archive.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The workbook contains no sheets.
    #[error("Workbook has no sheets")]
    NoSheets,

    /// Error writing CSV output.
    #[error("CSV write error: {0}")]
    Csv(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        // An I/O failure inside the csv writer (disk full, permissions) is
        // surfaced as Io so callers see one error type for the write side.
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            other => Error::Csv(format!("{:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format");

        let err = Error::NotAWorkbook("word document".to_string());
        assert_eq!(err.to_string(), "Not an Excel workbook: word document");

        let err = Error::MissingComponent("xl/workbook.xml".to_string());
        assert_eq!(err.to_string(), "Missing component: xl/workbook.xml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
