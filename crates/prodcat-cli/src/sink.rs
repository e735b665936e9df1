//! File output for assembled products.
//!
//! Column order is the field order of [`Product`]; the CSV header row is
//! derived from it on the first record.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use prodcat_scraper::Product;

use crate::OutputFormat;

/// Writes `products` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be created, or a
/// record cannot be serialized.
pub(crate) fn write_products(
    path: &Path,
    format: OutputFormat,
    products: &[Product],
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let written = match format {
        OutputFormat::Csv => write_csv(path, products),
        OutputFormat::Json => write_json(path, products),
    };
    written.with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), records = products.len(), "products written");
    Ok(())
}

fn write_csv(path: &Path, products: &[Product]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for product in products {
        writer.serialize(product)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, products: &[Product]) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, products)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;
