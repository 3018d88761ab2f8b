//! Resize + JPEG recompression.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Target width transcoded images are scaled to.
pub const DEFAULT_TARGET_WIDTH: u32 = 500;

/// JPEG quality transcoded images are recompressed at.
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

/// Fallback extension when a content type is absent or unrecognized.
const FALLBACK_EXTENSION: &str = "jpg";

/// Image transcoder: decode, scale to a fixed width, re-encode as JPEG.
#[derive(Debug, Clone)]
pub struct Transcoder {
    target_width: u32,
    jpeg_quality: u8,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Transcoder {
    pub fn new(target_width: u32, jpeg_quality: u8) -> Self {
        Self {
            target_width,
            jpeg_quality,
        }
    }

    /// Transform raw image bytes into a width-bounded JPEG.
    ///
    /// Aspect ratio is preserved; alpha is flattened since JPEG carries
    /// none. Fails if the bytes are not decodable as an image or encoding
    /// errors out.
    pub fn transcode(&self, bytes: &[u8]) -> MediaResult<Vec<u8>> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| MediaError::Decode(e.to_string()))?;

        let resized = img.resize(self.target_width, u32::MAX, FilterType::Lanczos3);
        let rgb = resized.to_rgb8();

        debug!(
            width = rgb.width(),
            height = rgb.height(),
            "transcoding image"
        );

        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| MediaError::Encode(e.to_string()))?;

        Ok(out)
    }
}

/// Derive a file extension from an HTTP content type, for key bookkeeping.
///
/// Never fails: unknown or missing types fall back to `jpg`.
pub fn extension_for(content_type: Option<&str>) -> &'static str {
    let Some(ct) = content_type else {
        return FALLBACK_EXTENSION;
    };
    let essence = ct.split(';').next().unwrap_or(ct).trim();

    match essence {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .copied()
            .unwrap_or(FALLBACK_EXTENSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_transcode_scales_to_target_width() {
        let src = png_fixture(1000, 400);
        let out = Transcoder::new(500, 50).transcode(&src).unwrap();

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.width(), 500);
        assert_eq!(decoded.height(), 200);
    }

    #[test]
    fn test_transcode_output_is_jpeg() {
        let src = png_fixture(64, 64);
        let out = Transcoder::default().transcode(&src).unwrap();
        assert_eq!(
            image::guess_format(&out).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_transcode_rejects_non_image_bytes() {
        let err = Transcoder::default().transcode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for(Some("image/png")), "png");
        assert_eq!(extension_for(Some("image/jpeg; charset=binary")), "jpg");
        assert_eq!(extension_for(Some("application/x-unknown-blob")), "jpg");
        assert_eq!(extension_for(None), "jpg");
    }
}
