//! Panel CSV store.
//!
//! The panel is persisted as `Date,<indicator>,...` rows in ascending date
//! order, followed by a single `# Updated on <timestamp> UTC` comment line.
//! The comment is a change marker for downstream refresh detection and is
//! never parsed back as data.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;

use crate::calendar::{format_date, parse_date};
use crate::error::{ForecastError, Result};
use crate::series::{Column, Panel};

/// Header name of the date column.
pub const DATE_COLUMN: &str = "Date";

/// Write `panel` to `path`, replacing any previous contents.
pub fn write_panel(panel: &Panel, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(panel.columns.iter().map(|c| c.name.clone()));
    writer.write_record(&header)?;

    for (row, date) in panel.dates.iter().enumerate() {
        let mut record = vec![format_date(*date)];
        for column in &panel.columns {
            record.push(match column.values[row] {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| ForecastError::Computation(e.to_string()))?;
    let marker = format!(
        "# Updated on {} UTC\n",
        Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f")
    );
    bytes.extend_from_slice(marker.as_bytes());

    fs::write(path, bytes)?;
    Ok(())
}

/// Read a panel previously written by [`write_panel`].
///
/// Comment lines are skipped. Fails with `DataFileNotFound` if the file is
/// absent and `SchemaMismatch` if the `Date` header is missing.
pub fn read_panel(path: &Path) -> Result<Panel> {
    let raw = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ForecastError::DataFileNotFound(path.display().to_string())
        } else {
            ForecastError::Io(e)
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.get(0) != Some(DATE_COLUMN) {
        return Err(ForecastError::SchemaMismatch(DATE_COLUMN.to_string()));
    }

    let mut dates = Vec::new();
    let mut columns: Vec<Column> = headers
        .iter()
        .skip(1)
        .map(|name| Column {
            name: name.to_string(),
            values: Vec::new(),
        })
        .collect();

    for record in reader.records() {
        let record = record?;
        dates.push(parse_date(record.get(0).unwrap_or_default())?);
        for (i, column) in columns.iter_mut().enumerate() {
            let cell = record.get(i + 1).unwrap_or_default().trim();
            let value = if cell.is_empty() {
                None
            } else {
                Some(cell.parse::<f64>().map_err(|_| {
                    ForecastError::Computation(format!(
                        "Invalid number '{}' in column {}",
                        cell, column.name
                    ))
                })?)
            };
            column.values.push(value);
        }
    }

    Ok(Panel { dates, columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Series;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample_panel() -> Panel {
        let oil = Series::with_points(
            "OILPRODUS",
            vec![(date(2002, 1), Some(310.5)), (date(2002, 2), Some(311.25))],
        );
        let gdp = Series::with_points(
            "GDPUS",
            vec![(date(2002, 1), Some(10.0)), (date(2002, 2), None)],
        );
        Panel::align(&[oil, gdp])
    }

    #[test]
    fn test_roundtrip_preserves_panel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("economic_data.csv");

        let panel = sample_panel();
        write_panel(&panel, &path).unwrap();
        let read = read_panel(&path).unwrap();

        assert_eq!(read, panel);
    }

    #[test]
    fn test_written_file_has_header_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("economic_data.csv");

        write_panel(&sample_panel(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();

        assert_eq!(lines.next(), Some("Date,OILPRODUS,GDPUS"));
        assert_eq!(lines.next(), Some("2002-01-01,310.5,10"));
        let last = raw.lines().last().unwrap();
        assert!(last.starts_with("# Updated on "));
        assert!(last.ends_with(" UTC"));
    }

    #[test]
    fn test_write_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("economic_data.csv");

        write_panel(&sample_panel(), &path).unwrap();
        let mut smaller = sample_panel();
        let keep = vec![true, false];
        smaller.retain_rows(&keep);
        write_panel(&smaller, &path).unwrap();

        let read = read_panel(&path).unwrap();
        assert_eq!(read.n_rows(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_panel(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ForecastError::DataFileNotFound(_)));
    }

    #[test]
    fn test_read_rejects_missing_date_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Month,OILPRODUS\n2002-01-01,1.0\n").unwrap();

        let err = read_panel(&path).unwrap_err();
        assert!(matches!(err, ForecastError::SchemaMismatch(_)));
    }
}
