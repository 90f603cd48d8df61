//! Workbook parsing: sheet discovery, active-sheet selection, and cell
//! extraction into a [`Grid`].

use crate::container::XlsxContainer;
use crate::detect;
use crate::error::{Error, Result};
use crate::grid::{CellValue, Grid};
use quick_xml::events::Event;
use std::collections::HashMap;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::Styles;

/// Sheet info from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Parse a cell reference like `B3` into a 1-indexed (row, column) pair.
///
/// Column letters follow the Excel scheme: A = 1 .. Z = 26, AA = 27, and so
/// on. Returns `None` for malformed references.
fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);

    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .chars()
        .map(|c| (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1)
        .try_fold(0u32, |acc, digit| {
            acc.checked_mul(26)?.checked_add(digit)
        })?;
    let row: u32 = digits.parse().ok().filter(|&r| r > 0)?;

    Some((row, col))
}

/// Parser for XLSX (Excel) workbooks.
///
/// Exposes the active worksheet as a cell grid; other sheets are listed but
/// never exported.
pub struct WorkbookParser {
    container: XlsxContainer,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    relationships: HashMap<String, String>,
    active_tab: usize,
}

impl WorkbookParser {
    /// Open an XLSX file for parsing.
    ///
    /// Fails when the file is missing, unreadable, or not a recognized
    /// workbook package.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Create a parser from workbook bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect::verify_xlsx_bytes(&data)?;
        let container = XlsxContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: XlsxContainer) -> Result<Self> {
        let shared_strings = if let Ok(xml) = container.read_xml("xl/sharedStrings.xml") {
            SharedStrings::parse(&xml)?
        } else {
            SharedStrings::default()
        };

        let styles = if let Ok(xml) = container.read_xml("xl/styles.xml") {
            Styles::parse(&xml)
        } else {
            Styles::default()
        };

        let relationships = Self::parse_workbook_rels(&container)?;
        let (sheets, active_tab) = Self::parse_workbook(&container)?;

        Ok(Self {
            container,
            shared_strings,
            styles,
            sheets,
            relationships,
            active_tab,
        })
    }

    /// Parse workbook relationships (sheet rId -> part target).
    fn parse_workbook_rels(container: &XlsxContainer) -> Result<HashMap<String, String>> {
        let mut rels = HashMap::new();

        if let Ok(xml) = container.read_xml("xl/_rels/workbook.xml.rels") {
            let mut reader = quick_xml::Reader::from_str(&xml);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();

            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                        if e.name().as_ref() == b"Relationship" {
                            let mut id = String::new();
                            let mut target = String::new();

                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"Id" => {
                                        id = String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    b"Target" => {
                                        target = String::from_utf8_lossy(&attr.value).to_string();
                                    }
                                    _ => {}
                                }
                            }

                            if !id.is_empty() && !target.is_empty() {
                                rels.insert(id, target);
                            }
                        }
                    }
                    Ok(Event::Eof) => break,
                    Err(e) => return Err(Error::XmlParse(e.to_string())),
                    _ => {}
                }
                buf.clear();
            }
        }

        Ok(rels)
    }

    /// Parse workbook.xml for sheet info and the active tab index.
    fn parse_workbook(container: &XlsxContainer) -> Result<(Vec<SheetInfo>, usize)> {
        let mut sheets = Vec::new();
        let mut active_tab = 0usize;

        let xml = container.read_xml("xl/workbook.xml")?;
        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        let mut name = String::new();
                        let mut rel_id = String::new();

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => {
                                    name = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                b"r:id" => {
                                    rel_id = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }

                        if !name.is_empty() {
                            sheets.push(SheetInfo { name, rel_id });
                        }
                    }
                    b"workbookView" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"activeTab" {
                                if let Ok(tab) = String::from_utf8_lossy(&attr.value).parse() {
                                    active_tab = tab;
                                }
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, active_tab))
    }

    /// Parse the active worksheet and return its cell grid.
    ///
    /// The active sheet is the one `workbookView/@activeTab` points at,
    /// falling back to the first sheet when the index is absent or out of
    /// range.
    pub fn parse_active_sheet(&mut self) -> Result<Grid> {
        if self.sheets.is_empty() {
            return Err(Error::NoSheets);
        }

        let index = if self.active_tab < self.sheets.len() {
            self.active_tab
        } else {
            0
        };
        let sheet = self.sheets[index].clone();

        let target = self.relationships.get(&sheet.rel_id).ok_or_else(|| {
            Error::MissingComponent(format!("relationship {} for sheet '{}'", sheet.rel_id, sheet.name))
        })?;

        let sheet_path = if let Some(stripped) = target.strip_prefix('/') {
            stripped.to_string()
        } else {
            format!("xl/{}", target)
        };

        let xml = self.container.read_xml(&sheet_path)?;
        self.parse_sheet(&xml)
    }

    /// Parse a worksheet XML part into a grid.
    ///
    /// Cell references (`r` attributes) are honored so sparse rows land at
    /// their true 1-indexed positions; cells without a reference fall back
    /// to the next position in document order.
    fn parse_sheet(&self, xml: &str) -> Result<Grid> {
        // No trim_text here: inline strings must keep their surrounding
        // whitespace, and the in_value guard already skips layout text.
        let mut grid = Grid::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut in_row = false;
        let mut in_cell = false;
        let mut in_value = false;
        let mut row_cursor: u32 = 0;
        let mut col_cursor: u32 = 0;
        let mut cell_row: u32 = 0;
        let mut cell_col: u32 = 0;
        let mut cell_type: Option<String> = None;
        let mut cell_style: Option<usize> = None;
        let mut cell_value = String::new();
        let mut has_value = false;

        loop {
            let event = reader.read_event_into(&mut buf);
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let is_empty = matches!(event, Ok(Event::Empty(_)));
                    match e.name().as_ref() {
                        b"row" => {
                            row_cursor += 1;
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"r" {
                                    if let Ok(r) = String::from_utf8_lossy(&attr.value).parse() {
                                        row_cursor = r;
                                    }
                                }
                            }
                            col_cursor = 0;
                            in_row = !is_empty;
                        }
                        b"c" if in_row => {
                            col_cursor += 1;
                            cell_row = row_cursor;
                            cell_col = col_cursor;
                            cell_type = None;
                            cell_style = None;
                            cell_value.clear();
                            has_value = false;

                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"r" => {
                                        let reference = String::from_utf8_lossy(&attr.value);
                                        if let Some((row, col)) = parse_cell_ref(&reference) {
                                            cell_row = row;
                                            cell_col = col;
                                            col_cursor = col;
                                        }
                                    }
                                    b"t" => {
                                        cell_type =
                                            Some(String::from_utf8_lossy(&attr.value).to_string());
                                    }
                                    b"s" => {
                                        cell_style =
                                            String::from_utf8_lossy(&attr.value).parse().ok();
                                    }
                                    _ => {}
                                }
                            }

                            in_cell = !is_empty;
                        }
                        b"v" | b"t" if in_cell && !is_empty => {
                            in_value = true;
                        }
                        _ => {}
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if in_value {
                        let text = e.unescape().unwrap_or_default();
                        cell_value.push_str(&text);
                        has_value = true;
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"row" => in_row = false,
                    b"c" => {
                        if has_value {
                            let value = self.resolve_cell_value(
                                &cell_value,
                                cell_type.as_deref(),
                                cell_style,
                            );
                            grid.set(cell_row, cell_col, value);
                        }
                        in_cell = false;
                    }
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(grid)
    }

    /// Resolve a raw cell value based on its type and style.
    fn resolve_cell_value(
        &self,
        value: &str,
        cell_type: Option<&str>,
        style: Option<usize>,
    ) -> CellValue {
        match cell_type {
            Some("s") => {
                // Shared string index
                if let Ok(idx) = value.parse::<usize>() {
                    CellValue::Text(self.shared_strings.get(idx).unwrap_or("").to_string())
                } else {
                    CellValue::Text(value.to_string())
                }
            }
            Some("b") => CellValue::Bool(value == "1"),
            Some("str") | Some("inlineStr") | Some("e") => CellValue::Text(value.to_string()),
            _ => {
                // Number or general
                match value.parse::<f64>() {
                    Ok(n) => {
                        let is_date = style.is_some_and(|s| self.styles.is_date_style(s));
                        if is_date {
                            match Styles::serial_to_date(n) {
                                Some(date) => CellValue::DateTime(date),
                                None => CellValue::Number(n),
                            }
                        } else {
                            CellValue::Number(n)
                        }
                    }
                    Err(_) => CellValue::Text(value.to_string()),
                }
            }
        }
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Name of the sheet `parse_active_sheet` will read.
    pub fn active_sheet_name(&self) -> Option<&str> {
        let index = if self.active_tab < self.sheets.len() {
            self.active_tab
        } else {
            0
        };
        self.sheets.get(index).map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((1, 1)));
        assert_eq!(parse_cell_ref("B3"), Some((3, 2)));
        assert_eq!(parse_cell_ref("Z10"), Some((10, 26)));
        assert_eq!(parse_cell_ref("AA1"), Some((1, 27)));
        assert_eq!(parse_cell_ref("AB2"), Some((2, 28)));
        assert_eq!(parse_cell_ref("c4"), Some((4, 3)));

        assert_eq!(parse_cell_ref(""), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("ABC"), None);
        assert_eq!(parse_cell_ref("A0"), None);
    }

    #[test]
    fn test_from_bytes_rejects_non_workbook() {
        let result = WorkbookParser::from_bytes(vec![0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
