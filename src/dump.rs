//! Flat binary dump of an ambiguity surface.
//!
//! Rows are written in order, each column as a little-endian `f64`, with no
//! header. Readers need the column count (`2N`) out of band.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::caf::AmbiguitySurface;
use crate::error::{CafError, Result};

pub fn write_surface<P: AsRef<Path>>(path: P, surface: &AmbiguitySurface) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| CafError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for value in surface.as_slice() {
        writer
            .write_all(&value.to_le_bytes())
            .map_err(|e| CafError::io(path, e))?;
    }
    writer.flush().map_err(|e| CafError::io(path, e))?;

    log::info!(
        "wrote {}x{} surface to {}",
        surface.rows(),
        surface.cols(),
        path.display()
    );
    Ok(())
}

/// Read a dump back given its row width
pub fn read_surface<P: AsRef<Path>>(path: P, cols: usize) -> Result<AmbiguitySurface> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| CafError::io(path, e))?;

    if bytes.is_empty() {
        return Ok(AmbiguitySurface::zeros(0, cols));
    }
    let row_bytes = cols * 8;
    if row_bytes == 0 || bytes.len() % row_bytes != 0 {
        return Err(CafError::Config(format!(
            "{}: {} bytes is not a whole number of {}-column rows",
            path.display(),
            bytes.len(),
            cols
        )));
    }

    let table = bytes
        .chunks_exact(row_bytes)
        .map(|row| {
            row.chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect()
        })
        .collect();
    AmbiguitySurface::from_rows(table)
}
