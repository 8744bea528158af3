use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::debug;
use ndarray::Array2;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::{Result, TepError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a numeric matrix from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.dat` / `.txt` / no extension – whitespace-delimited rows (the TEP archive format)
/// * `.csv`     – headerless comma-separated rows
/// * `.json`    – `[[...], [...], ...]`, one inner array per row
/// * `.parquet` – one numeric column per variable, one row per sample
///
/// The result is always oriented variables × samples: when the parsed matrix
/// has more rows than columns it is transposed.  This assumes samples always
/// outnumber variables, which holds for every TEP file but would silently
/// flip a genuinely wide data set.
pub fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    if !path.is_file() {
        return Err(TepError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let data = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        _ => load_whitespace(path)?,
    };

    Ok(orient(data, path))
}

/// Enforce rows = variables, columns = samples.
fn orient(data: Array2<f64>, path: &Path) -> Array2<f64> {
    let (rows, cols) = data.dim();
    if rows > cols {
        debug!("{}: {rows}x{cols}, transposing", path.display());
        data.reversed_axes().as_standard_layout().into_owned()
    } else {
        debug!("{}: {rows}x{cols}", path.display());
        data
    }
}

/// Assemble parsed rows into a matrix, checking they are rectangular.
fn rows_to_matrix(rows: Vec<Vec<f64>>, path: &Path, first_line: &[usize]) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);

    let mut flat = Vec::with_capacity(n_rows * n_cols);
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != n_cols {
            let line = first_line.get(i).copied().unwrap_or(i + 1);
            return Err(TepError::parse(
                path,
                line,
                format!("expected {n_cols} values but found {}", row.len()),
            ));
        }
        flat.extend(row);
    }

    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| TepError::Shape(format!("{}: {e}", path.display())))
}

/// Read a text file, reporting invalid UTF-8 as a parse error on the line
/// where it occurs.
fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        TepError::parse(path, line, "invalid UTF-8")
    })
}

// ---------------------------------------------------------------------------
// Whitespace loader
// ---------------------------------------------------------------------------

/// One matrix row per line, values separated by any run of whitespace.
/// Blank lines are skipped.
fn load_whitespace(path: &Path) -> Result<Array2<f64>> {
    let text = read_text(path)?;
    let mut rows = Vec::new();
    let mut line_numbers = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>().map_err(|_| {
                    TepError::parse(path, i + 1, format!("column {j}: '{tok}' is not a number"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
        line_numbers.push(i + 1);
    }

    rows_to_matrix(rows, path, &line_numbers)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Headerless CSV, one matrix row per record.
fn load_csv(path: &Path) -> Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut line_numbers = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(rows.len() + 1, |p| p.line() as usize);
        let row = record
            .iter()
            .enumerate()
            .map(|(j, tok)| {
                tok.parse::<f64>().map_err(|_| {
                    TepError::parse(path, line, format!("column {j}: '{tok}' is not a number"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
        line_numbers.push(line);
    }

    rows_to_matrix(rows, path, &line_numbers)
}

/// Undecodable bytes are malformed content, not an I/O failure.
fn csv_error(path: &Path, err: csv::Error) -> TepError {
    let utf8_line = match err.kind() {
        csv::ErrorKind::Utf8 { pos, .. } => {
            Some(pos.as_ref().map_or(0, |p| p.line() as usize))
        }
        _ => None,
    };
    match utf8_line {
        Some(line) => TepError::parse(path, line, "invalid UTF-8"),
        None => TepError::Csv(err),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema: an array of equally long numeric arrays.
///
/// ```json
/// [[0.25, 3674.0, 4504.0],
///  [0.27, 3659.4, 4477.8]]
/// ```
fn load_json(path: &Path) -> Result<Array2<f64>> {
    let text = read_text(path)?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| TepError::parse(path, e.line(), e.to_string()))?;

    let records = root
        .as_array()
        .ok_or_else(|| TepError::parse(path, 1, "expected top-level JSON array"))?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let values = rec
                .as_array()
                .ok_or_else(|| TepError::parse(path, i + 1, format!("row {i} is not an array")))?;
            values
                .iter()
                .enumerate()
                .map(|(j, v)| {
                    v.as_f64().ok_or_else(|| {
                        TepError::parse(path, i + 1, format!("row {i}, [{j}]: not a number"))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    // JSON has no useful line numbers, report the row instead.
    let positions: Vec<usize> = (1..=rows.len()).collect();
    rows_to_matrix(rows, path, &positions)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one numeric column per variable.
///
/// Float64, Float32, Int64 and Int32 columns are accepted; nulls become NaN.
/// The matrix is read samples × variables and then oriented like any other.
fn load_parquet(path: &Path) -> Result<Array2<f64>> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut columns: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        if columns.is_empty() {
            columns = vec![Vec::new(); batch.num_columns()];
        }
        for (idx, col) in batch.columns().iter().enumerate() {
            let values = extract_f64_column(col).map_err(|message| {
                TepError::parse(path, 0, format!("column {idx}: {message}"))
            })?;
            columns[idx].extend(values);
        }
    }

    let n_vars = columns.len();
    let n_samples = columns.first().map_or(0, Vec::len);
    Ok(Array2::from_shape_fn((n_samples, n_vars), |(s, v)| columns[v][s]))
}

/// Widen a numeric Arrow column into `f64`s.
fn extract_f64_column(col: &Arc<dyn Array>) -> std::result::Result<Vec<f64>, String> {
    let nan = f64::NAN;
    match col.data_type() {
        DataType::Float64 => {
            let arr = downcast::<Float64Array>(col)?;
            Ok(arr.iter().map(|v| v.unwrap_or(nan)).collect())
        }
        DataType::Float32 => {
            let arr = downcast::<Float32Array>(col)?;
            Ok(arr.iter().map(|v| v.map_or(nan, f64::from)).collect())
        }
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(col)?;
            Ok(arr.iter().map(|v| v.map_or(nan, |i| i as f64)).collect())
        }
        DataType::Int32 => {
            let arr = downcast::<Int32Array>(col)?;
            Ok(arr.iter().map(|v| v.map_or(nan, f64::from)).collect())
        }
        other => Err(format!("expected a numeric column, got {other:?}")),
    }
}

fn downcast<T: 'static>(col: &Arc<dyn Array>) -> std::result::Result<&T, String> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| format!("unexpected array type {:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn wide_file_is_kept_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "d00.dat", "  1.0  2.0  3.0\n  4.0 5.0   6.0\n");
        let m = load_matrix(&path).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[1, 2]], 6.0);
    }

    #[test]
    fn tall_file_is_transposed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "d00_te.dat", "1 2\n3 4\n5 6\n\n");
        let m = load_matrix(&path).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m.row(0).to_vec(), vec![1.0, 3.0, 5.0]);
        assert_eq!(m.row(1).to_vec(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn scientific_notation_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "x.dat", "2.5038000e-01 3.6740000e+03 4.5290000e+03\n");
        let m = load_matrix(&path).unwrap();
        assert_eq!(m[[0, 1]], 3674.0);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_matrix(&dir.path().join("d07.dat")).unwrap_err();
        assert!(matches!(err, TepError::FileNotFound { .. }));
    }

    #[test]
    fn bad_token_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.dat", "1 2 3\n4 five 6\n");
        match load_matrix(&path).unwrap_err() {
            TepError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("five"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "ragged.dat", "1 2 3\n\n4 5\n");
        match load_matrix(&path).unwrap_err() {
            TepError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_empty_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "empty.dat", "\n\n");
        assert_eq!(load_matrix(&path).unwrap().dim(), (0, 0));
    }

    #[test]
    fn csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(&dir, "m.csv", "1, 2, 3, 4\n5, 6, 7, 8\n");
        let m = load_matrix(&csv).unwrap();
        assert_eq!(m.dim(), (2, 4));
        assert_eq!(m[[1, 0]], 5.0);

        let json = write(&dir, "m.json", "[[1, 2], [3, 4], [5, 6]]");
        let m = load_matrix(&json).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m.row(0).to_vec(), vec![1.0, 3.0, 5.0]);

        let bad = write(&dir, "bad.json", "[[1, 2], [3, \"x\"]]");
        assert!(matches!(load_matrix(&bad), Err(TepError::Parse { .. })));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["bytes.dat", "bytes.json"] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"1 2 3\n\xff\xfe 4 5\n").unwrap();
            match load_matrix(&path).unwrap_err() {
                TepError::Parse { line, message, .. } => {
                    assert_eq!(line, 2, "{name}");
                    assert!(message.contains("UTF-8"));
                }
                other => panic!("unexpected error {other:?}"),
            }
        }

        let csv = dir.path().join("bytes.csv");
        std::fs::write(&csv, b"1,2,3\n\xff\xfe,4,5\n").unwrap();
        assert!(matches!(load_matrix(&csv), Err(TepError::Parse { .. })));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "cut.json", "[[1, 2],\n [3, ");
        assert!(matches!(
            load_matrix(&path),
            Err(TepError::Parse { line: 2, .. })
        ));
    }
}
