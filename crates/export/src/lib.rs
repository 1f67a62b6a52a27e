//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod trajectory {
    use std::io::Write;

    use astro_ode::Trajectory;

    use crate::ExportError;

    /// Write one row per sample: `t` followed by the state labelled by `labels`.
    ///
    /// `extra` columns (name, values) are appended; each must hold one value per
    /// sample, or one fewer for per-interval quantities, whose last row is left empty.
    pub fn write_csv(
        writer: &mut dyn Write,
        labels: &[&str],
        trajectory: &Trajectory,
        extra: &[(&str, &[f64])],
    ) -> Result<(), ExportError> {
        let samples = trajectory.len();
        for (name, values) in extra {
            if values.len() != samples && values.len() + 1 != samples {
                return Err(ExportError::RaggedColumns {
                    column: name.to_string(),
                    expected: samples,
                    actual: values.len(),
                });
            }
        }

        let mut csv = csv::Writer::from_writer(writer);
        let mut header = vec!["t"];
        header.extend_from_slice(labels);
        header.extend(extra.iter().map(|(name, _)| *name));
        csv.write_record(&header)?;

        for (i, (t, y)) in trajectory.t.iter().zip(&trajectory.y).enumerate() {
            let mut row = Vec::with_capacity(header.len());
            row.push(t.to_string());
            row.extend(y.iter().take(labels.len()).map(|v| v.to_string()));
            row.extend(
                extra
                    .iter()
                    .map(|(_, values)| values.get(i).map(|v| v.to_string()).unwrap_or_default()),
            );
            csv.write_record(&row)?;
        }
        csv.flush()?;
        log::debug!("wrote {samples} trajectory rows");
        Ok(())
    }

    /// Write equally long named columns side by side.
    pub fn write_columns(writer: &mut dyn Write, columns: &[(&str, &[f64])]) -> Result<(), ExportError> {
        let rows = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
        if let Some((name, values)) = columns.iter().find(|(_, values)| values.len() != rows) {
            return Err(ExportError::RaggedColumns {
                column: name.to_string(),
                expected: rows,
                actual: values.len(),
            });
        }
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(columns.iter().map(|(name, _)| *name))?;
        for i in 0..rows {
            csv.write_record(columns.iter().map(|(_, values)| values[i].to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }
}

pub mod porkchop {
    use std::io::Write;

    use astro_interplanetary::PorkchopGrid;

    use crate::ExportError;

    /// Write every grid cell, departure-major, with a header row.
    pub fn write_csv(writer: &mut dyn Write, grid: &PorkchopGrid) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for point in &grid.points {
            csv.serialize(point)?;
        }
        csv.flush()?;
        log::debug!("wrote {} pork-chop rows", grid.points.len());
        Ok(())
    }
}

pub mod sidecar {
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::ExportError;

    /// Path of the `<stem>_<suffix>.json` file next to `output`.
    pub fn sidecar_path(output: &Path, suffix: &str) -> PathBuf {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("mission");
        parent.join(format!("{stem}_{suffix}.json"))
    }

    /// Write `value` as pretty JSON followed by a newline.
    pub fn write_pretty<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), ExportError> {
        to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write `value` as pretty JSON next to `output` and return its path.
    pub fn write_json<T: Serialize>(output: &Path, suffix: &str, value: &T) -> Result<PathBuf, ExportError> {
        let path = sidecar_path(output, suffix);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(BufWriter::new(File::create(&path)?), value)?;
        Ok(path)
    }
}
