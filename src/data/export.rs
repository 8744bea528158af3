use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use ndarray::Array2;
use parquet::arrow::ArrowWriter;

use super::loader::load_matrix;
use super::model::DataSetId;
use crate::error::{Result, TepError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write a variables × samples matrix to a file.  Dispatch by extension.
///
/// Every format stores one sample per row / record, matching how the TEP
/// test files are laid out, so [`load_matrix`] reads them back unchanged
/// as long as samples outnumber variables.
///
/// * `.csv`     – headerless comma-separated rows
/// * `.json`    – array of row arrays; NaN and infinities have no JSON
///   number form, so a matrix holding them is a [`TepError::Shape`] and no
///   file is written
/// * `.parquet` – one Float64 column per variable (`v0`, `v1`, …)
/// * anything else – whitespace-delimited text
pub fn write_matrix(path: &Path, data: &Array2<f64>) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(path, data)?,
        "json" => write_json(path, data)?,
        "parquet" | "pq" => write_parquet(path, data)?,
        _ => write_whitespace(path, data)?,
    }
    debug!("wrote {:?} matrix to {}", data.dim(), path.display());
    Ok(())
}

fn write_whitespace(path: &Path, data: &Array2<f64>) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for sample in data.columns() {
        for v in sample {
            write!(out, "  {v:e}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn write_csv(path: &Path, data: &Array2<f64>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for sample in data.columns() {
        writer.write_record(sample.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, data: &Array2<f64>) -> Result<()> {
    if let Some(((var, sample), v)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(TepError::Shape(format!(
            "{} holds {v} at variable {var}, sample {sample}; JSON has no non-finite numbers",
            path.display()
        )));
    }
    let rows: Vec<Vec<f64>> = data.columns().into_iter().map(|c| c.to_vec()).collect();
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(out, &rows)?;
    Ok(())
}

fn write_parquet(path: &Path, data: &Array2<f64>) -> Result<()> {
    let fields: Vec<Field> = (0..data.nrows())
        .map(|v| Field::new(format!("v{v}"), DataType::Float64, false))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = data
        .rows()
        .into_iter()
        .map(|row| Arc::new(Float64Array::from(row.to_vec())) as ArrayRef)
        .collect();

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), None)?;
    if !columns.is_empty() {
        let batch = RecordBatch::try_new(schema, columns)?;
        writer.write(&batch)?;
    }
    writer.close()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Directory conversion
// ---------------------------------------------------------------------------

/// Convert every `dNN.<ext>` / `dNN_te.<ext>` found in `src` into the plain
/// `dNN.dat` / `dNN_te.dat` layout in `dst`.
///
/// `dst` is created if needed. Absent source files are skipped; the names of
/// the written files are returned in canonical order.
pub fn convert_directory(src: &Path, dst: &Path, ext: &str) -> Result<Vec<String>> {
    std::fs::create_dir_all(dst)?;
    let ext = ext.trim_start_matches('.');

    let mut written = Vec::new();
    let stems = DataSetId::all()
        .map(DataSetId::training_stem)
        .chain(DataSetId::all().map(DataSetId::test_stem));

    for stem in stems {
        let from = src.join(format!("{stem}.{ext}"));
        if !from.is_file() {
            continue;
        }
        let name = format!("{stem}.dat");
        let matrix = load_matrix(&from)?;
        write_matrix(&dst.join(&name), &matrix)?;
        written.push(name);
    }

    info!(
        "converted {} .{ext} file(s) from {} into {}",
        written.len(),
        src.display(),
        dst.display()
    );
    Ok(written)
}
