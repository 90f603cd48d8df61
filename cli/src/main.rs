//! xl2csv CLI - Excel workbook to CSV conversion
//!
//! Takes a single workbook path, converts the active sheet to a CSV file in
//! the current working directory, and reports the row count.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use xl2csv::{Extent, ExportOptions, WorkbookParser};

/// Convert an Excel workbook to CSV
#[derive(Parser)]
#[command(
    name = "xl2csv",
    version,
    about = "Convert an Excel workbook to CSV",
    long_about = "xl2csv - Excel workbook to CSV conversion.\n\n\
                  Converts the active sheet of an .xlsx workbook to a CSV file in the\n\
                  current working directory. Data is assumed to start at row 2, column 1,\n\
                  with a header in row 1; string cells are trimmed of surrounding\n\
                  whitespace."
)]
struct Cli {
    /// Input workbook path
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut parser = WorkbookParser::open(&cli.input)?;
    let grid = parser.parse_active_sheet()?;
    let extent = Extent::detect(&grid);

    let output = xl2csv::output_name(&cli.input);
    let csvname = output.display().to_string();

    // Row 1 is the header and is not exported, so the expected record
    // count is one less than the detected last row.
    let expected = if extent.last_column == 0 {
        0
    } else {
        u64::from(extent.last_row.saturating_sub(1))
    };
    let pb = create_progress_bar(expected, &csvname);

    let options = ExportOptions::new();
    let file = std::fs::File::create(&output)?;
    let mut writer = options.writer(file);

    let count = xl2csv::write_rows(&grid, extent, &mut writer, |_| pb.inc(1))?;
    writer.flush()?;

    pb.finish_and_clear();
    println!("Wrote {} rows to '{}'", count, csvname);

    Ok(())
}

fn create_progress_bar(len: u64, csvname: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {bar:40.cyan/blue} {pos}/{len}")
            .unwrap(),
    );
    pb.set_message(format!("Writing '{}'...", csvname));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_single_positional() {
        let cli = Cli::parse_from(["xl2csv", "data.xlsx"]);
        assert_eq!(cli.input, PathBuf::from("data.xlsx"));
    }
}
