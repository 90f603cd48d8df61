//! Styles parsing for date number-format detection.
//!
//! Excel stores dates as serial numbers; whether a numeric cell is a date
//! is decided by the number format attached to its cell style.

use quick_xml::events::Event;
use std::collections::HashMap;

/// Styles information parsed from xl/styles.xml.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell style formats: style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from xl/styles.xml content.
    ///
    /// Parse failures degrade to an empty style table rather than aborting
    /// the load; a workbook without usable styles just loses date typing.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => styles.push_xf(e),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"numFmt" if in_num_fmts => styles.push_num_fmt(e),
                    b"xf" if in_cell_xfs => styles.push_xf(e),
                    _ => {}
                },
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"numFmts" => in_num_fmts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
            buf.clear();
        }

        styles
    }

    fn push_xf(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let mut num_fmt_id: u32 = 0;
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"numFmtId" {
                if let Ok(id) = String::from_utf8_lossy(&attr.value).parse() {
                    num_fmt_id = id;
                }
            }
        }
        self.cell_xfs.push(num_fmt_id);
    }

    fn push_num_fmt(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let mut num_fmt_id: Option<u32> = None;
        let mut format_code = String::new();
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"numFmtId" => {
                    num_fmt_id = String::from_utf8_lossy(&attr.value).parse().ok();
                }
                b"formatCode" => {
                    format_code = String::from_utf8_lossy(&attr.value).to_string();
                }
                _ => {}
            }
        }
        if let Some(id) = num_fmt_id {
            self.num_fmts.insert(id, format_code);
        }
    }

    /// Whether the cell style at `style_index` carries a date format.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        match self.cell_xfs.get(style_index) {
            Some(&id) => self.is_date_format(id),
            None => false,
        }
    }

    /// Check if a numFmtId represents a date format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in formats: 14-22 are dates, 45-47 are times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }

        if let Some(format_code) = self.num_fmts.get(&num_fmt_id) {
            return Self::is_date_format_code(format_code);
        }

        false
    }

    /// Check if a format code string represents a date format.
    ///
    /// Looks for day/month/year pattern characters outside quoted text and
    /// bracketed sections ([Red], [$-409]).
    fn is_date_format_code(format_code: &str) -> bool {
        let mut in_bracket = false;
        let mut in_quote = false;
        let mut prev_char = '\0';

        for c in format_code.chars() {
            match c {
                '[' if !in_quote => in_bracket = true,
                ']' if !in_quote => in_bracket = false,
                '"' => in_quote = !in_quote,
                _ if !in_bracket && !in_quote => {
                    match c.to_ascii_lowercase() {
                        'd' | 'y' => return true,
                        'm' => {
                            // 'm' is month or minute. Month when next to
                            // day/year patterns, minute in h:mm / mm:ss.
                            let lower_prev = prev_char.to_ascii_lowercase();
                            if lower_prev == 'd' || lower_prev == 'y' {
                                return true;
                            }
                            let lower_format = format_code.to_lowercase();
                            if lower_format.contains('d') || lower_format.contains('y') {
                                return true;
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            prev_char = c;
        }

        false
    }

    /// Convert an Excel serial date number to an ISO-8601 string.
    ///
    /// Excel counts days from December 30, 1899 and pretends February 29,
    /// 1900 exists (the Lotus 1-2-3 compatibility bug); serials above 60 are
    /// shifted down by one to compensate.
    pub fn serial_to_date(serial: f64) -> Option<String> {
        if serial < 0.0 {
            return None;
        }

        let adjusted_serial = if serial > 60.0 { serial - 1.0 } else { serial };
        let days = adjusted_serial.floor() as i64;

        let (year, month, day) = days_to_ymd(days)?;

        let time_fraction = serial.fract();
        if time_fraction > 0.0001 {
            let total_seconds = (time_fraction * 86400.0).round() as u32;
            let hours = total_seconds / 3600;
            let minutes = (total_seconds % 3600) / 60;
            let seconds = total_seconds % 60;
            Some(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                year, month, day, hours, minutes, seconds
            ))
        } else {
            Some(format!("{:04}-{:02}-{:02}", year, month, day))
        }
    }
}

/// Convert days since December 31, 1899 to (year, month, day).
fn days_to_ymd(days: i64) -> Option<(i32, u32, u32)> {
    if days < 1 {
        return None;
    }

    let mut year = 1900;
    let mut remaining_days = days;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days <= days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let months_days = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for &days_in_month in &months_days {
        if remaining_days <= days_in_month as i64 {
            break;
        }
        remaining_days -= days_in_month as i64;
        month += 1;
    }

    let day = remaining_days.max(1) as u32;

    Some((year, month, day))
}

/// Check if a year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_date_formats() {
        let styles = Styles::default();

        assert!(styles.is_date_format(14)); // m/d/yyyy
        assert!(styles.is_date_format(15)); // d-mmm-yy
        assert!(styles.is_date_format(22)); // m/d/yy h:mm
        assert!(styles.is_date_format(45)); // mm:ss

        assert!(!styles.is_date_format(0)); // General
        assert!(!styles.is_date_format(1)); // 0
        assert!(!styles.is_date_format(2)); // 0.00
    }

    #[test]
    fn test_custom_date_format_detection() {
        assert!(Styles::is_date_format_code("yyyy-mm-dd"));
        assert!(Styles::is_date_format_code("d/m/yy"));
        assert!(Styles::is_date_format_code("[$-409]mmmm\\ d\\,\\ yyyy;@"));

        assert!(!Styles::is_date_format_code("0.00"));
        assert!(!Styles::is_date_format_code("#,##0"));
        assert!(!Styles::is_date_format_code("\"$\"#,##0.00"));
    }

    #[test]
    fn test_parse_styles_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <numFmts count="1">
        <numFmt numFmtId="164" formatCode="yyyy-mm-dd"/>
    </numFmts>
    <cellXfs count="3">
        <xf numFmtId="0"/>
        <xf numFmtId="14"/>
        <xf numFmtId="164"/>
    </cellXfs>
</styleSheet>"#;

        let styles = Styles::parse(xml);
        assert!(!styles.is_date_style(0));
        assert!(styles.is_date_style(1));
        assert!(styles.is_date_style(2));
        assert!(!styles.is_date_style(99));
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(Styles::serial_to_date(1.0), Some("1900-01-01".to_string()));
        assert_eq!(Styles::serial_to_date(59.0), Some("1900-02-28".to_string()));
        // Serial 60 is the fake Feb 29, 1900
        assert_eq!(Styles::serial_to_date(61.0), Some("1900-03-01".to_string()));
        assert_eq!(
            Styles::serial_to_date(44197.0),
            Some("2021-01-01".to_string())
        );

        // With time component
        assert_eq!(
            Styles::serial_to_date(44197.5),
            Some("2021-01-01T12:00:00".to_string())
        );

        assert_eq!(Styles::serial_to_date(-1.0), None);
    }
}
