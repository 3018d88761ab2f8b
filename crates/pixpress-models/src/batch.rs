//! Batch row types.
//!
//! Rows carry the original spreadsheet columns verbatim; processing appends
//! one output column. Multi-value cells hold comma-separated URLs.

use serde::{Deserialize, Serialize};

/// Delimiter used when joining published URLs into the output cell.
pub const OUTPUT_URL_SEPARATOR: &str = ", ";

/// One input row of the batch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "S. No.")]
    pub serial_no: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Input Image Urls")]
    pub input_image_urls: String,
}

impl ProductRow {
    /// Ordered source references parsed from the raw input cell.
    pub fn input_refs(&self) -> Vec<String> {
        split_image_urls(&self.input_image_urls)
    }
}

/// One augmented output row: all input columns plus the published URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "S. No.")]
    pub serial_no: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Input Image Urls")]
    pub input_image_urls: String,
    #[serde(rename = "Output Image Urls")]
    pub output_image_urls: String,
}

impl OutputRow {
    /// Augment `row` with the published URLs for its items.
    pub fn from_row(row: ProductRow, output_urls: &[String]) -> Self {
        Self {
            serial_no: row.serial_no,
            product_name: row.product_name,
            input_image_urls: row.input_image_urls,
            output_image_urls: join_image_urls(output_urls),
        }
    }
}

/// Split a comma-delimited URL cell into trimmed, non-empty references.
///
/// Empty and whitespace-only entries are dropped silently, so a row whose
/// cell is all separators yields no references at all.
pub fn split_image_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join published URLs back into an output cell.
pub fn join_image_urls(urls: &[String]) -> String {
    urls.join(OUTPUT_URL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_and_drops_empties() {
        let refs = split_image_urls(" http://a/1.png ,, http://b/2.png ,   ,");
        assert_eq!(refs, vec!["http://a/1.png", "http://b/2.png"]);
    }

    #[test]
    fn test_split_empty_cell() {
        assert!(split_image_urls("").is_empty());
        assert!(split_image_urls("  , ,  ").is_empty());
    }

    #[test]
    fn test_join_round_trip_format() {
        let urls = vec!["http://x/1.jpg".to_string(), "http://x/2.jpg".to_string()];
        assert_eq!(join_image_urls(&urls), "http://x/1.jpg, http://x/2.jpg");
        assert_eq!(join_image_urls(&[]), "");
    }

    #[test]
    fn test_from_row_keeps_identity_columns() {
        let row = ProductRow {
            serial_no: "1".into(),
            product_name: "Widget".into(),
            input_image_urls: "http://a/1.png".into(),
        };
        let out = OutputRow::from_row(row, &["http://cdn/1.jpg".to_string()]);
        assert_eq!(out.serial_no, "1");
        assert_eq!(out.product_name, "Widget");
        assert_eq!(out.input_image_urls, "http://a/1.png");
        assert_eq!(out.output_image_urls, "http://cdn/1.jpg");
    }
}
