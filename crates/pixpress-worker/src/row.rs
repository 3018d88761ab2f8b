//! Row processor: best-effort item loop over one batch row.

use tracing::warn;

use pixpress_models::{OutputRow, ProductRow};

use crate::error::ItemFailure;
use crate::item::ItemTranscoder;

/// Result of processing one row. Rows never fail: a row where every item
/// failed still yields an output row, with an empty output cell and the
/// failures recorded here.
#[derive(Debug)]
pub struct RowOutcome {
    pub row: OutputRow,
    pub failures: Vec<ItemFailure>,
}

/// Process every reference of one row, in reference order.
///
/// Each item is isolated: a failure is logged, recorded on the outcome and
/// excluded from the output cell, and the remaining references still run.
pub async fn process_row(item: &ItemTranscoder, row: ProductRow) -> RowOutcome {
    let refs = row.input_refs();
    let mut published = Vec::with_capacity(refs.len());
    let mut failures = Vec::new();

    for reference in &refs {
        match item.process(reference).await {
            Ok(url) => published.push(url),
            Err(error) => {
                warn!(
                    serial_no = %row.serial_no,
                    reference = %reference,
                    %error,
                    "item failed, continuing with remaining references"
                );
                failures.push(ItemFailure::new(reference, &error));
            }
        }
    }

    RowOutcome {
        row: OutputRow::from_row(row, &published),
        failures,
    }
}
