use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Save records to a CSV file, one row per record with a header row
pub fn save_to_csv<T: Serialize>(records: &[T], filename: impl AsRef<Path>) -> Result<()> {
    let filename = filename.as_ref();
    let mut writer = csv::Writer::from_path(filename)
        .with_context(|| format!("Failed to create CSV file {}", filename.display()))?;

    for record in records {
        writer
            .serialize(record)
            .context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}
