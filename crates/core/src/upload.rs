//! Validation for user-uploaded images.
//!
//! The declared multipart content type is not trusted; the format is sniffed
//! from the leading bytes and must be one of the supported image formats.

use image::ImageFormat;

/// Largest accepted image upload (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";
pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_WEBP: &str = "image/webp";

/// A sniffed, accepted image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedImage {
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Check size and sniff the format of an uploaded image.
pub fn validate_image(bytes: &[u8]) -> Result<AcceptedImage, String> {
    if bytes.is_empty() {
        return Err("Uploaded file is empty".to_string());
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(format!(
            "Image exceeds the {} MiB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        ));
    }

    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok(AcceptedImage {
            content_type: CONTENT_TYPE_JPEG,
            extension: "jpg",
        }),
        Ok(ImageFormat::Png) => Ok(AcceptedImage {
            content_type: CONTENT_TYPE_PNG,
            extension: "png",
        }),
        Ok(ImageFormat::WebP) => Ok(AcceptedImage {
            content_type: CONTENT_TYPE_WEBP,
            extension: "webp",
        }),
        _ => Err("Unsupported image format. Use JPEG, PNG, or WebP".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn accepts_png_and_jpeg() {
        assert_eq!(validate_image(PNG_MAGIC).unwrap().content_type, CONTENT_TYPE_PNG);
        let jpeg = validate_image(JPEG_MAGIC).unwrap();
        assert_eq!(jpeg.content_type, CONTENT_TYPE_JPEG);
        assert_eq!(jpeg.extension, "jpg");
    }

    #[test]
    fn rejects_non_images() {
        assert!(validate_image(b"%PDF-1.7 not an image").is_err());
        assert!(validate_image(&[]).unwrap_err().contains("empty"));
    }

    #[test]
    fn rejects_oversized_upload() {
        let mut big = PNG_MAGIC.to_vec();
        big.resize(MAX_IMAGE_BYTES + 1, 0);
        assert!(validate_image(&big).unwrap_err().contains("limit"));
    }
}
