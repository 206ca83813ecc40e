//! ESRI ASCII grid reading/writing
//!
//! The format is a fixed six-line header followed by one text line per
//! grid row:
//!
//! ```text
//! ncols         4
//! nrows         2
//! xllcorner     -141.0
//! yllcorner     41.5
//! cellsize      0.5
//! NODATA_value  -9999
//! 1 2 3 -9999
//! 5 6 7 8
//! ```

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Header keys in the order they are written
const HEADER_KEYS: [&str; 6] = [
    "ncols",
    "nrows",
    "xllcorner",
    "yllcorner",
    "cellsize",
    "NODATA_value",
];

/// Width the header keys are padded to on output
const KEY_WIDTH: usize = 13;

/// Options for writing ASCII grid files
#[derive(Debug, Clone, Default)]
pub struct AsciiGridOptions {
    /// Fixed number of decimals for floating point cells.
    /// `None` writes the shortest representation that reads back exactly.
    pub precision: Option<usize>,
}

/// The six header fields of an ASCII grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiHeader {
    pub ncols: usize,
    pub nrows: usize,
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub cellsize: f64,
    pub nodata_value: i64,
}

impl AsciiHeader {
    /// Header describing an in-memory raster.
    ///
    /// The raster must carry an integral no-data value.
    pub fn of<T: RasterElement>(raster: &Raster<T>) -> Result<Self> {
        let nodata = raster.nodata().ok_or(Error::NoDataNotSet)?;
        let nodata_value = RasterElement::to_f64(nodata)
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .ok_or_else(|| Error::InvalidParameter {
                name: "NODATA_value",
                value: nodata.to_string(),
                reason: "must be an integer".into(),
            })? as i64;

        let gt = raster.transform();
        Ok(Self {
            ncols: raster.cols(),
            nrows: raster.rows(),
            xllcorner: gt.x_ll,
            yllcorner: gt.y_ll,
            cellsize: gt.cell_size,
            nodata_value,
        })
    }

    /// Parse the header from the first six lines.
    fn parse<'a, I>(lines: &mut I) -> Result<Self>
    where
        I: Iterator<Item = (usize, &'a str)>,
    {
        // (value, line number) per key, indexed like HEADER_KEYS
        let mut fields: [Option<(f64, usize)>; 6] = [None; 6];

        for expected_line in 1..=HEADER_KEYS.len() {
            let (line_no, line) = lines.next().ok_or_else(|| {
                Error::format(expected_line, "unexpected end of file inside header")
            })?;

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 2 {
                return Err(Error::format(
                    line_no,
                    format!(
                        "header line must be '<key> <value>', found {} tokens",
                        tokens.len()
                    ),
                ));
            }

            let (key, raw) = (tokens[0], tokens[1]);
            let idx = HEADER_KEYS
                .iter()
                .position(|k| k.eq_ignore_ascii_case(key))
                .ok_or_else(|| Error::format(line_no, format!("unknown header key '{}'", key)))?;

            if fields[idx].is_some() {
                return Err(Error::format(
                    line_no,
                    format!("duplicate header key '{}'", HEADER_KEYS[idx]),
                ));
            }

            let value: f64 = raw.parse().map_err(|_| {
                Error::format(line_no, format!("invalid value '{}' for '{}'", raw, key))
            })?;
            fields[idx] = Some((value, line_no));
        }

        let mut values = [(0.0, 0); 6];
        for (idx, field) in fields.iter().enumerate() {
            values[idx] = field.ok_or_else(|| {
                Error::format(
                    HEADER_KEYS.len(),
                    format!("missing header key '{}'", HEADER_KEYS[idx]),
                )
            })?;
        }

        let ncols = positive_count(values[0], HEADER_KEYS[0])?;
        let nrows = positive_count(values[1], HEADER_KEYS[1])?;
        if ncols.checked_mul(nrows).is_none() {
            return Err(Error::format(
                values[0].1.max(values[1].1),
                format!("{} x {} cells overflow the addressable size", ncols, nrows),
            ));
        }
        let nodata_value = exact_integer(values[5], HEADER_KEYS[5])?;

        let (cellsize, line) = values[4];
        if !(cellsize.is_finite() && cellsize > 0.0) {
            return Err(Error::format(line, "cellsize must be positive"));
        }

        Ok(Self {
            ncols,
            nrows,
            xllcorner: values[2].0,
            yllcorner: values[3].0,
            cellsize,
            nodata_value,
        })
    }

    fn write_to(&self, out: &mut String) {
        let fields = [
            self.ncols.to_string(),
            self.nrows.to_string(),
            self.xllcorner.to_string(),
            self.yllcorner.to_string(),
            self.cellsize.to_string(),
            self.nodata_value.to_string(),
        ];
        for (key, value) in HEADER_KEYS.iter().zip(fields) {
            // Writing into a String cannot fail
            let _ = writeln!(out, "{:<width$} {}", key, value, width = KEY_WIDTH);
        }
    }

    fn transform(&self) -> GeoTransform {
        GeoTransform::new(self.xllcorner, self.yllcorner, self.cellsize)
    }
}

fn exact_integer((value, line): (f64, usize), key: &str) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(Error::format(
            line,
            format!("{} must be an integer, found {}", key, value),
        ));
    }
    // i64::MAX rounds up to 2^63 as an f64, which is itself out of range
    if value >= i64::MAX as f64 || value < i64::MIN as f64 {
        return Err(Error::format(
            line,
            format!("{} is out of range, found {}", key, value),
        ));
    }
    Ok(value as i64)
}

fn positive_count(field: (f64, usize), key: &str) -> Result<usize> {
    let value = exact_integer(field, key)?;
    if value <= 0 {
        return Err(Error::format(
            field.1,
            format!("{} must be positive, found {}", key, value),
        ));
    }
    usize::try_from(value)
        .map_err(|_| Error::format(field.1, format!("{} is out of range, found {}", key, value)))
}

/// Parse ASCII grid text into a Raster.
///
/// `T` decides how cells are read: integer element types reject tokens
/// that are not integers.
pub fn parse_ascii_grid<T: RasterElement>(text: &str) -> Result<Raster<T>> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let header = AsciiHeader::parse(&mut lines)?;

    // Grows with the rows actually present, never from the declared size
    let mut data = Vec::new();
    for row in 0..header.nrows {
        let (line_no, line) = lines.next().ok_or_else(|| {
            Error::format(
                HEADER_KEYS.len() + row + 1,
                format!("expected {} rows, found {}", header.nrows, row),
            )
        })?;

        let before = data.len();
        for token in line.split_whitespace() {
            let value = token.parse::<T>().map_err(|_| {
                Error::format(line_no, format!("invalid cell value '{}'", token))
            })?;
            data.push(value);
        }

        let found = data.len() - before;
        if found != header.ncols {
            return Err(Error::format(
                line_no,
                format!("row {} has {} values, expected {}", row, found, header.ncols),
            ));
        }
    }

    if let Some((line_no, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(Error::format(
            line_no,
            format!("data continues past the declared {} rows", header.nrows),
        ));
    }

    let nodata: T = num_traits::cast(header.nodata_value).ok_or_else(|| Error::InvalidParameter {
        name: "NODATA_value",
        value: header.nodata_value.to_string(),
        reason: "not representable in the cell type".into(),
    })?;

    let mut raster = Raster::from_vec(data, header.nrows, header.ncols)?;
    raster.set_transform(header.transform());
    raster.set_nodata(Some(nodata));
    Ok(raster)
}

/// Serialize a Raster as ASCII grid text.
pub fn to_ascii_grid<T: RasterElement>(raster: &Raster<T>, options: &AsciiGridOptions) -> Result<String> {
    let header = AsciiHeader::of(raster)?;

    let mut out = String::new();
    header.write_to(&mut out);

    let mut tokens = Vec::with_capacity(raster.cols());
    for row in raster.data().rows() {
        tokens.clear();
        tokens.extend(row.iter().map(|v| v.to_token(options.precision)));
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    Ok(out)
}

/// Read an ASCII grid file into a Raster
pub fn read_ascii_grid<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::from(e).in_file(path))?;
    let raster = parse_ascii_grid(&text).map_err(|e| e.in_file(path))?;
    debug!(
        path = %path.display(),
        rows = raster.rows(),
        cols = raster.cols(),
        "read ASCII grid"
    );
    Ok(raster)
}

/// Write a Raster to an ASCII grid file.
///
/// The text goes to a temporary file next to `path` which is then renamed
/// over it, so a failed write never leaves a truncated grid behind.
pub fn write_ascii_grid<T, P>(raster: &Raster<T>, path: P, options: Option<AsciiGridOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = to_ascii_grid(raster, &options.unwrap_or_default()).map_err(|e| e.in_file(path))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let persist = || -> Result<()> {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    };
    persist().map_err(|e| e.in_file(path))?;

    debug!(path = %path.display(), "wrote ASCII grid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ncols         3
nrows         2
xllcorner     -141.5
yllcorner     41.25
cellsize      0.5
NODATA_value  -9999
1 2 -9999
4 5 6
";

    fn format_line(err: Error) -> usize {
        match err {
            Error::Format { line, .. } => line,
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_integer_grid() {
        let raster: Raster<i64> = parse_ascii_grid(SAMPLE).unwrap();
        assert_eq!(raster.shape(), (2, 3));
        assert_eq!(raster.get(1, 2).unwrap(), 6);
        assert_eq!(raster.cell(0, 2).unwrap(), None);
        assert_eq!(raster.nodata(), Some(-9999));
        assert_eq!(*raster.transform(), GeoTransform::new(-141.5, 41.25, 0.5));
    }

    #[test]
    fn test_parse_real_grid() {
        let text = SAMPLE.replace("4 5 6", "4.5 5e-3 -6.25");
        let raster: Raster<f64> = parse_ascii_grid(&text).unwrap();
        assert_eq!(raster.get(1, 1).unwrap(), 0.005);
        assert_eq!(raster.cell(0, 2).unwrap(), None);
    }

    #[test]
    fn test_integer_grid_rejects_fractions() {
        let text = SAMPLE.replace("4 5 6", "4 5.5 6");
        let err = parse_ascii_grid::<i64>(&text).unwrap_err();
        assert_eq!(format_line(err), 8);
    }

    #[test]
    fn test_header_keys_case_insensitive_and_any_order() {
        let text = "\
NROWS 1
ncols 2
cellsize 1
nodata_value -1
xllcorner 0
yllcorner 0
7 8
";
        let raster: Raster<i64> = parse_ascii_grid(text).unwrap();
        assert_eq!(raster.shape(), (1, 2));
        assert_eq!(raster.nodata(), Some(-1));
    }

    #[test]
    fn test_header_line_with_wrong_token_count() {
        let text = SAMPLE.replace("cellsize      0.5", "cellsize 0.5 extra");
        assert_eq!(format_line(parse_ascii_grid::<i64>(&text).unwrap_err()), 5);
    }

    #[test]
    fn test_missing_header_key() {
        let text = SAMPLE.replace("NODATA_value  -9999\n", "");
        let err = parse_ascii_grid::<i64>(&text).unwrap_err();
        assert_eq!(format_line(err), 6);
    }

    #[test]
    fn test_duplicate_header_key() {
        let text = SAMPLE.replace("nrows         2", "ncols 3");
        assert!(matches!(
            parse_ascii_grid::<i64>(&text),
            Err(Error::Format { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_integer_counts_rejected() {
        let text = SAMPLE.replace("ncols         3", "ncols 3.5");
        assert_eq!(format_line(parse_ascii_grid::<i64>(&text).unwrap_err()), 1);

        let text = SAMPLE.replace("NODATA_value  -9999", "NODATA_value -9999.5");
        assert_eq!(format_line(parse_ascii_grid::<f64>(&text).unwrap_err()), 6);
    }

    #[test]
    fn test_row_length_mismatch() {
        let text = SAMPLE.replace("4 5 6", "4 5");
        assert_eq!(format_line(parse_ascii_grid::<i64>(&text).unwrap_err()), 8);
    }

    #[test]
    fn test_row_count_mismatch() {
        let short = SAMPLE.replace("4 5 6\n", "");
        assert!(parse_ascii_grid::<i64>(&short).is_err());

        let long = format!("{SAMPLE}7 8 9\n");
        assert_eq!(format_line(parse_ascii_grid::<i64>(&long).unwrap_err()), 9);

        let trailing_blank = format!("{SAMPLE}\n  \n");
        assert!(parse_ascii_grid::<i64>(&trailing_blank).is_ok());
    }

    #[test]
    fn test_oversized_header_reports_missing_rows() {
        let text = SAMPLE.replace("nrows         2", "nrows         100000000000");
        match parse_ascii_grid::<i64>(&text) {
            Err(Error::Format { line, reason }) => {
                assert_eq!(line, 9);
                assert!(reason.contains("expected 100000000000 rows, found 2"), "{reason}");
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_cell_count_overflow_rejected() {
        let text = SAMPLE
            .replace("ncols         3", "ncols         10000000000")
            .replace("nrows         2", "nrows         10000000000");
        assert_eq!(format_line(parse_ascii_grid::<i64>(&text).unwrap_err()), 2);
    }

    #[test]
    fn test_header_integers_beyond_i64_rejected() {
        let text = SAMPLE.replace("ncols         3", "ncols 1e19");
        assert_eq!(format_line(parse_ascii_grid::<i64>(&text).unwrap_err()), 1);

        let text = SAMPLE.replace("NODATA_value  -9999", "NODATA_value -1e30");
        assert_eq!(format_line(parse_ascii_grid::<f64>(&text).unwrap_err()), 6);
    }

    #[test]
    fn test_write_layout() {
        let raster: Raster<i64> = parse_ascii_grid(SAMPLE).unwrap();
        let text = to_ascii_grid(&raster, &AsciiGridOptions::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ncols         3");
        assert_eq!(lines[2], "xllcorner     -141.5");
        assert_eq!(lines[5], "NODATA_value  -9999");
        assert_eq!(lines[6], "1 2 -9999");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_roundtrip_real_values() {
        let mut raster = Raster::from_vec(vec![0.1, -1.0 / 3.0, 1e-12, -9999.0], 2, 2).unwrap();
        raster.set_nodata(Some(-9999.0));
        raster.set_transform(GeoTransform::new(0.1, 0.2, 0.3));

        let text = to_ascii_grid(&raster, &AsciiGridOptions::default()).unwrap();
        let back: Raster<f64> = parse_ascii_grid(&text).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn test_fixed_precision() {
        let mut raster = Raster::from_vec(vec![1.0 / 3.0, 2.0], 1, 2).unwrap();
        raster.set_nodata(Some(-9999.0));
        let options = AsciiGridOptions { precision: Some(4) };

        let text = to_ascii_grid(&raster, &options).unwrap();
        assert!(text.ends_with("0.3333 2.0000\n"));
    }

    #[test]
    fn test_write_requires_nodata() {
        let raster: Raster<f64> = Raster::new(1, 1);
        assert!(matches!(
            to_ascii_grid(&raster, &AsciiGridOptions::default()),
            Err(Error::NoDataNotSet)
        ));
    }

    #[test]
    fn test_file_roundtrip_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.asc");

        let raster: Raster<i64> = parse_ascii_grid(SAMPLE).unwrap();
        write_ascii_grid(&raster, &path, None).unwrap();
        let back: Raster<i64> = read_ascii_grid(&path).unwrap();
        assert_eq!(back, raster);

        std::fs::write(&path, SAMPLE.replace("4 5 6", "4 5")).unwrap();
        match read_ascii_grid::<i64, _>(&path) {
            Err(Error::File { path: p, source }) => {
                assert_eq!(p, path);
                assert!(matches!(*source, Error::Format { line: 8, .. }));
            }
            other => panic!("expected file error, got {other:?}"),
        }
    }
}
