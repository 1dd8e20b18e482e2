use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

/// Returns true when the path ends in `.gz`.
pub fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Get a writer that gzip-compresses its output when the path ends in `.gz`.
///
/// The returned writer must be flushed (or dropped) to finish the gzip stream;
/// use [`finish_dynamic_writer`] to surface errors from the final flush.
///
/// # Arguments
///
/// - path: path to the file to create
///
pub fn get_dynamic_writer(path: &Path) -> Result<BufWriter<Box<dyn Write>>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let file: Box<dyn Write> = match is_gzipped(path) {
        true => Box::new(GzEncoder::new(file, Compression::default())),
        false => Box::new(file),
    };

    Ok(BufWriter::new(file))
}

/// Flush a writer obtained from [`get_dynamic_writer`] and release the file.
pub fn finish_dynamic_writer(writer: BufWriter<Box<dyn Write>>) -> Result<()> {
    let mut inner = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush output: {}", e.error()))?;
    inner.flush()?;
    // dropping the encoder writes the gzip trailer
    drop(inner);
    Ok(())
}
