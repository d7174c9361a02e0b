use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::repositories::product_repository::{NewProduct, ProductRepository};

/// Counts reported by a catalog CSV load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub skipped: u64,
}

/// Read a catalog CSV and insert every well-formed row.
///
/// Rows that fail to parse are logged and skipped, as are rows the
/// database rejects. The batch never aborts on a bad row.
pub async fn import_csv(
    repository: &ProductRepository,
    path: &Path,
) -> Result<ImportSummary, ServiceError> {
    info!(path = %path.display(), "Importing catalog CSV");

    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        ServiceError::InternalError(format!("Cannot open CSV file {}: {}", path.display(), e))
    })?;

    let mut rows = Vec::new();
    let mut skipped = 0u64;

    for (position, record) in reader.deserialize::<NewProduct>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(row = position + 1, error = %e, "Skipping malformed CSV row");
                skipped += 1;
            }
        }
    }

    let (inserted, failed) = repository.bulk_insert(rows).await?;
    let summary = ImportSummary {
        inserted,
        skipped: skipped + failed,
    };

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Catalog CSV import finished"
    );
    Ok(summary)
}
