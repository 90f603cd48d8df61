//! Shared strings table parsing.

use crate::error::{Error, Result};
use quick_xml::events::Event;

/// The workbook's shared strings table.
///
/// Rich-text entries (`<si>` with multiple `<r>` runs) are flattened by
/// concatenating their run texts.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from the xl/sharedStrings.xml content.
    pub fn parse(xml: &str) -> Result<Self> {
        // Text is taken verbatim: cell strings keep their surrounding
        // whitespace so trimming stays an export-time decision.
        let mut strings = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut current = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"t" if in_si => in_t = true,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_t {
                        let text = e.unescape().unwrap_or_default();
                        current.push_str(&text);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(current.clone());
                        in_si = false;
                    }
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { strings })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
