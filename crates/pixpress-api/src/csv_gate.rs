//! Pre-core CSV validation gate.
//!
//! Enforces column presence and per-row well-formedness before a job is
//! created, so the pipeline may assume the file's shape. Violations are
//! collected into one detail list rather than failing on the first.

use crate::error::ApiError;

const REQUIRED_HEADERS: [&str; 3] = ["S. No.", "Product Name", "Input Image Urls"];

/// Validate an uploaded batch file. Returns every violation found.
pub fn validate_batch(bytes: &[u8]) -> Result<(), ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let mut details = Vec::new();

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            return Err(ApiError::InvalidCsv {
                details: vec![format!("Unreadable CSV: {e}")],
            })
        }
    };

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h.trim() == *required))
        .collect();
    if !missing.is_empty() {
        details.push(format!("Missing headers: {}", missing.join(", ")));
    }

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let serial_idx = column("S. No.");
    let name_idx = column("Product Name");
    let urls_idx = column("Input Image Urls");

    let mut row_count = 0usize;
    for (i, result) in reader.records().enumerate() {
        let row_num = i + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                details.push(format!("Unreadable row {row_num}: {e}"));
                continue;
            }
        };
        row_count += 1;

        if let Some(idx) = serial_idx {
            let serial = record.get(idx).unwrap_or("").trim();
            if serial.is_empty() || serial.parse::<i64>().is_err() {
                details.push(format!("Invalid or missing S. No. in row {row_num}"));
            }
        }
        if let Some(idx) = name_idx {
            if record.get(idx).unwrap_or("").trim().is_empty() {
                details.push(format!("Invalid or missing Product Name in row {row_num}"));
            }
        }
        if let Some(idx) = urls_idx {
            if record.get(idx).unwrap_or("").trim().is_empty() {
                details.push(format!("Invalid or missing Input Image Urls in row {row_num}"));
            }
        }
    }

    if row_count == 0 && details.is_empty() {
        details.push("CSV contains no data rows".to_string());
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::InvalidCsv { details })
    }
}
