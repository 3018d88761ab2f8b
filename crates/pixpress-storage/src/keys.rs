//! Object key layout.
//!
//! Transcoded images land under `compressed_images/`, batch artifacts under
//! `csv_outputs/`.

use chrono::Utc;

/// Key for one transcoded image.
///
/// Derived from the source reference's basename with any query string
/// stripped, prefixed with a millisecond timestamp so republished sources
/// never collide.
pub fn image_key(source_ref: &str, extension: &str) -> String {
    let basename = source_basename(source_ref);
    format!(
        "compressed_images/{}-{}.{}",
        Utc::now().timestamp_millis(),
        basename,
        extension
    )
}

/// Key for a job's published batch artifact.
pub fn artifact_key(job_id: &str) -> String {
    format!("csv_outputs/{}.csv", job_id)
}

fn source_basename(source_ref: &str) -> String {
    let without_query = source_ref.split(['?', '#']).next().unwrap_or(source_ref);
    let base = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    // Drop the source's own extension; the transcoded one is appended.
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_key_strips_query_and_extension() {
        let key = image_key("http://cdn.example/photos/widget.png?sig=abc", "jpg");
        assert!(key.starts_with("compressed_images/"));
        assert!(key.ends_with("-widget.jpg"));
        assert!(!key.contains('?'));
    }

    #[test]
    fn test_image_key_always_has_extension() {
        let key = image_key("http://cdn.example/", "jpg");
        assert!(key.starts_with("compressed_images/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_artifact_key() {
        assert_eq!(
            artifact_key("123e4567-e89b-12d3-a456-426614174000"),
            "csv_outputs/123e4567-e89b-12d3-a456-426614174000.csv"
        );
    }
}
