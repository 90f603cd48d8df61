//! Input validation for Excel workbooks.
//!
//! The loader refuses anything that is not an xlsx package before parsing
//! begins: the file must be a ZIP archive whose `[Content_Types].xml`
//! declares the spreadsheet main part (with an `xl/` folder-structure
//! fallback for producers that omit the override).

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the XLSX workbook main part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Verify that the file at `path` is an Excel workbook.
pub fn verify_xlsx_path(path: impl AsRef<Path>) -> Result<()> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    verify_xlsx_reader(reader)
}

/// Verify that a byte slice holds an Excel workbook.
pub fn verify_xlsx_bytes(data: &[u8]) -> Result<()> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    verify_xlsx_reader(std::io::Cursor::new(data))
}

/// Verify that a reader yields an Excel workbook.
pub fn verify_xlsx_reader<R: Read + Seek>(reader: R) -> Result<()> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(XLSX_CONTENT_TYPE) {
        return Ok(());
    }

    // Fallback: accept packages that carry an xl/ tree even without the
    // explicit content-type override.
    if archive.file_names().any(|n| n.starts_with("xl/")) {
        return Ok(());
    }

    Err(Error::NotAWorkbook(
        "package has no spreadsheet main part".to_string(),
    ))
}
