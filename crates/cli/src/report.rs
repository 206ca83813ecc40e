//! Tabular report and missing-data diagnostics

use anyhow::{Context, Result};
use gridscore_algorithms::region::{MissingnessDiagnostic, Table};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Open `path` for writing, or `fallback` when no path is configured
fn sink(path: Option<&Path>, fallback: Box<dyn Write>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(fallback),
    }
}

/// Write `table` as CSV: `Row,Column,<names>` then one record per row
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["Row".to_string(), "Column".to_string()];
    header.extend(table.columns().iter().cloned());
    csv.write_record(&header)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 2);
        record.push(row.row.to_string());
        record.push(row.col.to_string());
        record.extend(row.values.iter().map(|v| v.to_string()));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the CSV report to `path`, or stdout
pub fn write_report(table: &Table, path: Option<&Path>) -> Result<()> {
    let out = sink(path, Box::new(io::stdout().lock()))?;
    write_table(table, out).context("Failed to write report")
}

/// One `MISSING <row> <col> <values...>` line per diagnostic
pub fn write_diagnostics<W: Write>(diagnostics: &[MissingnessDiagnostic], mut writer: W) -> Result<()> {
    for d in diagnostics {
        write!(writer, "MISSING {} {}", d.row, d.col)?;
        for v in &d.values {
            write!(writer, " {v}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write diagnostics to `path`, or stderr
pub fn emit_diagnostics(diagnostics: &[MissingnessDiagnostic], path: Option<&Path>) -> Result<()> {
    let out = sink(path, Box::new(io::stderr().lock()))?;
    write_diagnostics(diagnostics, out).context("Failed to write diagnostics")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscore_algorithms::region::TabularRow;

    #[test]
    fn test_table_csv() {
        let mut table = Table::new(vec!["Population".into(), "Elevation".into()]);
        table
            .push(TabularRow { row: 0, col: 3, values: vec![12.0, -0.5] })
            .unwrap();
        table
            .push(TabularRow { row: 2, col: 1, values: vec![7.0, 1.25] })
            .unwrap();

        let mut buf = Vec::new();
        write_table(&table, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Row,Column,Population,Elevation\n0,3,12,-0.5\n2,1,7,1.25\n"
        );
    }

    #[test]
    fn test_empty_table_has_header() {
        let table = Table::new(vec!["a".into()]);
        let mut buf = Vec::new();
        write_table(&table, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Row,Column,a\n");
    }

    #[test]
    fn test_diagnostic_lines() {
        let diagnostics = vec![
            MissingnessDiagnostic { row: 1, col: 1, values: vec![1.0, 40.0, -9999.0] },
            MissingnessDiagnostic { row: 4, col: 0, values: vec![124.0, 0.5] },
        ];
        let mut buf = Vec::new();
        write_diagnostics(&diagnostics, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "MISSING 1 1 1 40 -9999\nMISSING 4 0 124 0.5\n"
        );
    }

    #[test]
    fn test_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let table = Table::new(vec!["x".into()]);

        write_report(&table, Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Row,Column,x\n");
    }
}
