//! Clipboard image value objects and data URI conversion

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::domain::error::DataUriError;

/// Prefix of every data URI produced by this crate
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Decoded clipboard image: tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl RawImage {
    /// Create a new raw image
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes,
        }
    }

    /// An image with no pixels carries nothing worth recording
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.bytes.is_empty()
    }

    /// Encode as a self-contained PNG data URI
    pub fn to_data_uri(&self) -> Result<String, DataUriError> {
        let actual = self.bytes.len();
        let buffer = RgbaImage::from_raw(self.width, self.height, self.bytes.clone()).ok_or(
            DataUriError::SizeMismatch {
                width: self.width,
                height: self.height,
                actual,
            },
        )?;

        let mut png = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| DataUriError::Encode(e.to_string()))?;

        Ok(format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(&png)))
    }

    /// Decode a base64 data URI back into RGBA pixels
    pub fn from_data_uri(uri: &str) -> Result<Self, DataUriError> {
        let (header, payload) = uri.split_once(',').ok_or(DataUriError::Malformed)?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return Err(DataUriError::Malformed);
        }

        let encoded = STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;

        let decoded = image::load_from_memory(&encoded)
            .map_err(|e| DataUriError::Decode(e.to_string()))?
            .to_rgba8();

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            bytes: decoded.into_raw(),
        })
    }
}

/// Persisted image value: an embedded data URI plus its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Encode a raw clipboard image
    pub fn from_raw(raw: &RawImage) -> Result<Self, DataUriError> {
        Ok(Self {
            url: raw.to_data_uri()?,
            width: raw.width,
            height: raw.height,
        })
    }

    /// Decode back into pixels suitable for a clipboard write
    pub fn to_raw(&self) -> Result<RawImage, DataUriError> {
        RawImage::from_data_uri(&self.url)
    }

    /// Encoded size of the data URI
    pub fn human_readable_size(&self) -> String {
        let bytes = self.url.len();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(width: u32, height: u32) -> RawImage {
        let mut bytes = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let on = (x + y) % 2 == 0;
                let v = if on { 255 } else { 0 };
                bytes.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RawImage::new(width, height, bytes)
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let uri = checkerboard(2, 2).to_data_uri().unwrap();
        assert!(uri.starts_with(PNG_DATA_URI_PREFIX));
    }

    #[test]
    fn decoded_image_keeps_dimensions_and_pixels() {
        let original = checkerboard(3, 5);
        let data = ImageData::from_raw(&original).unwrap();
        assert_eq!((data.width, data.height), (3, 5));

        let decoded = data.to_raw().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let raw = RawImage::new(4, 4, vec![0; 7]);
        assert!(matches!(
            raw.to_data_uri(),
            Err(DataUriError::SizeMismatch { actual: 7, .. })
        ));
    }

    #[test]
    fn non_data_uri_is_malformed() {
        assert!(matches!(
            RawImage::from_data_uri("https://example.com/a.png"),
            Err(DataUriError::Malformed)
        ));
    }

    #[test]
    fn bad_base64_is_reported() {
        assert!(matches!(
            RawImage::from_data_uri("data:image/png;base64,@@@"),
            Err(DataUriError::InvalidBase64(_))
        ));
    }

    #[test]
    fn empty_image_detection() {
        assert!(RawImage::new(0, 10, vec![]).is_empty());
        assert!(!checkerboard(1, 1).is_empty());
    }

    #[test]
    fn human_readable_size_small() {
        let data = ImageData {
            url: "x".repeat(100),
            width: 1,
            height: 1,
        };
        assert_eq!(data.human_readable_size(), "100 B");
    }
}
