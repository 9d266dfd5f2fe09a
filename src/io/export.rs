//! Export the summary and growth tables, and read them back.
//!
//! Each table is written twice: as CSV (the form `tables` reads back) and as
//! an `.xlsx` workbook for spreadsheet users. Unavailable values are written
//! as empty cells in both.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{GrowthRow, GrowthTable, SummaryRow, SummaryTable};
use crate::error::ExportError;

pub const SUMMARY_FILE: &str = "predicted_crimes.csv";
pub const GROWTH_FILE: &str = "predicted_growth.csv";
pub const SUMMARY_WORKBOOK: &str = "predicted_crimes.xlsx";
pub const GROWTH_WORKBOOK: &str = "predicted_growth.xlsx";

const SUMMARY_HEADER: [&str; 2] = ["City", "Total Predicted Crimes"];
const GROWTH_HEADER: [&str; 2] = ["City", "Predicted Growth %"];

/// Write both tables into `out_dir`, creating it if needed. Returns the CSV
/// paths followed by the workbook paths.
pub fn export_tables(
    out_dir: &Path,
    summary: &SummaryTable,
    growth: &GrowthTable,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let summary_path = out_dir.join(SUMMARY_FILE);
    write_summary_csv(&summary_path, summary)?;

    let growth_path = out_dir.join(GROWTH_FILE);
    write_growth_csv(&growth_path, growth)?;

    let summary_book = out_dir.join(SUMMARY_WORKBOOK);
    write_summary_workbook(&summary_book, summary)?;

    let growth_book = out_dir.join(GROWTH_WORKBOOK);
    write_growth_workbook(&growth_book, growth)?;

    Ok(vec![summary_path, growth_path, summary_book, growth_book])
}

/// Read both tables back from `dir`.
pub fn import_tables(dir: &Path) -> Result<(SummaryTable, GrowthTable), ExportError> {
    let summary = read_summary_csv(&dir.join(SUMMARY_FILE))?;
    let growth = read_growth_csv(&dir.join(GROWTH_FILE))?;
    Ok((summary, growth))
}

/// Columns: `City`, `Total Predicted Crimes`.
pub fn write_summary_csv(path: &Path, table: &SummaryTable) -> Result<(), ExportError> {
    write_rows(path, &table.rows)
}

/// Columns: `City`, `Predicted Growth %`.
pub fn write_growth_csv(path: &Path, table: &GrowthTable) -> Result<(), ExportError> {
    write_rows(path, &table.rows)
}

pub fn read_summary_csv(path: &Path) -> Result<SummaryTable, ExportError> {
    Ok(SummaryTable {
        rows: read_rows::<SummaryRow>(path)?,
    })
}

pub fn read_growth_csv(path: &Path) -> Result<GrowthTable, ExportError> {
    Ok(GrowthTable {
        rows: read_rows::<GrowthRow>(path)?,
    })
}

pub fn write_summary_workbook(path: &Path, table: &SummaryTable) -> Result<(), ExportError> {
    let cells = table.rows.iter().map(|r| (r.city.as_str(), r.total));
    write_workbook(path, SUMMARY_HEADER, cells)
}

pub fn write_growth_workbook(path: &Path, table: &GrowthTable) -> Result<(), ExportError> {
    let cells = table.rows.iter().map(|r| (r.city.as_str(), r.growth));
    write_workbook(path, GROWTH_HEADER, cells)
}

/// One worksheet: a header row, then `(city, value)` rows. `None` values
/// leave the cell empty.
fn write_workbook<'a>(
    path: &Path,
    header: [&str; 2],
    rows: impl Iterator<Item = (&'a str, Option<f64>)>,
) -> Result<(), ExportError> {
    let xlsx_err = |source| ExportError::Xlsx {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in (0u16..).zip(header) {
        sheet.write_string(0, col, name).map_err(xlsx_err)?;
    }

    let mut written = 0;
    for (row, (city, value)) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, city).map_err(xlsx_err)?;
        if let Some(v) = value {
            sheet.write_number(row, 1, v).map_err(xlsx_err)?;
        }
        written += 1;
    }

    workbook.save(path).map_err(xlsx_err)?;
    log::debug!("wrote {written} rows to {}", path.display());
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path).map_err(csv_err)?;
    reader.deserialize().map(|r| r.map_err(csv_err)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tables() -> (SummaryTable, GrowthTable) {
        let summary = SummaryTable {
            rows: vec![
                SummaryRow {
                    city: "Ballari".to_string(),
                    total: Some(2221.483_920_117_3),
                },
                SummaryRow {
                    city: "Flat".to_string(),
                    total: None,
                },
                SummaryRow {
                    city: "Bengaluru".to_string(),
                    total: Some(5_214.0),
                },
            ],
        };
        let growth = GrowthTable {
            rows: vec![
                GrowthRow {
                    city: "Ballari".to_string(),
                    growth: Some(12.37),
                },
                GrowthRow {
                    city: "Flat".to_string(),
                    growth: None,
                },
                GrowthRow {
                    city: "Bengaluru".to_string(),
                    growth: Some(-0.5),
                },
            ],
        };
        (summary, growth)
    }

    #[test]
    fn exported_tables_read_back_identically() {
        let dir = tempdir().unwrap();
        let (summary, growth) = tables();

        let paths = export_tables(dir.path(), &summary, &growth).unwrap();
        assert_eq!(paths.len(), 4);

        let (summary_back, growth_back) = import_tables(dir.path()).unwrap();
        assert_eq!(summary_back, summary);
        assert_eq!(growth_back, growth);
    }

    #[test]
    fn header_and_empty_cells() {
        let dir = tempdir().unwrap();
        let (summary, growth) = tables();
        export_tables(dir.path(), &summary, &growth).unwrap();

        let text = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "City,Total Predicted Crimes");
        assert_eq!(lines[2], "Flat,");

        let text = fs::read_to_string(dir.path().join(GROWTH_FILE)).unwrap();
        assert_eq!(text.lines().next(), Some("City,Predicted Growth %"));
        assert_eq!(text.lines().nth(1), Some("Ballari,12.37"));
    }

    #[test]
    fn workbooks_are_written_next_to_csv() {
        let dir = tempdir().unwrap();
        let (summary, growth) = tables();
        let paths = export_tables(dir.path(), &summary, &growth).unwrap();

        assert_eq!(paths[2], dir.path().join(SUMMARY_WORKBOOK));
        assert_eq!(paths[3], dir.path().join(GROWTH_WORKBOOK));
        for book in &paths[2..] {
            // xlsx is a zip container.
            let bytes = fs::read(book).unwrap();
            assert_eq!(&bytes[..2], b"PK", "{}", book.display());
        }
    }

    #[test]
    fn workbook_into_missing_directory_is_an_export_error() {
        let dir = tempdir().unwrap();
        let (summary, _) = tables();
        let path = dir.path().join("absent").join(SUMMARY_WORKBOOK);
        let err = write_summary_workbook(&path, &summary).unwrap_err();
        assert!(matches!(err, ExportError::Xlsx { .. }));
    }

    #[test]
    fn missing_file_is_an_export_error() {
        let dir = tempdir().unwrap();
        let err = read_summary_csv(&dir.path().join(SUMMARY_FILE)).unwrap_err();
        assert!(matches!(err, ExportError::Csv { .. }));
    }
}
