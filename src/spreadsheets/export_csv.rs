use crate::domain::PropertyRecord;
use crate::errors::ExportError;
use crate::scraper::TableRow;
use std::path::Path;
use tracing::{info, warn};

fn csv_err(path: &Path, e: csv::Error) -> ExportError {
    if e.is_io_error() {
        ExportError::Io(format!("{}: {e}", path.display()))
    } else {
        ExportError::Csv(format!("{}: {e}", path.display()))
    }
}

/// Writes `price,address,link` plus one row per record.
///
/// Returns the number of rows written. An empty slice writes nothing.
pub fn write_properties_csv(path: &Path, records: &[PropertyRecord]) -> Result<usize, ExportError> {
    if records.is_empty() {
        warn!("⚠️ No properties to save");
        return Ok(0);
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|e| csv_err(path, e))?;

    for record in records {
        wtr.serialize(record).map_err(|e| csv_err(path, e))?;
    }

    wtr.flush()
        .map_err(|e| ExportError::Io(format!("{}: {e}", path.display())))?;

    info!("Saved {} properties to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
pub fn read_properties_csv(path: &Path) -> Result<Vec<PropertyRecord>, ExportError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| csv_err(path, e))?;

    rdr.deserialize()
        .map(|row| row.map_err(|e| csv_err(path, e)))
        .collect()
}

/// Writes scraped table rows as-is; the first row is expected to be the header.
pub fn write_rows_csv(path: &Path, rows: &[TableRow]) -> Result<usize, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    for row in rows {
        wtr.write_record(row).map_err(|e| csv_err(path, e))?;
    }

    wtr.flush()
        .map_err(|e| ExportError::Io(format!("{}: {e}", path.display())))?;

    info!("Saved {} response rows to {}", rows.len(), path.display());
    Ok(rows.len())
}
