//! Core data types produced by the ingestion pipeline.
//!
//! Both types are transient: created once per ingest call, handed to the
//! catalog for persistence (or discarded on failure), never mutated.

use serde::{Deserialize, Serialize};

/// Normalized EXIF metadata extracted from an upload.
///
/// Every field is independently optional. Absence in the source image yields
/// absence here; no field is ever fabricated or defaulted to a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParsedExif {
    /// Camera manufacturer, whitespace-trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    /// Camera model, whitespace-trimmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// Lens name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,

    /// Focal length in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f32>,

    /// Aperture f-number (e.g. 2.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f32>,

    /// Exposure time in display form (e.g. "1/500" or "2s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,

    /// ISO sensitivity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,

    /// Capture timestamp, ISO-8601 (`YYYY-MM-DDTHH:MM:SS`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,

    /// GPS latitude (decimal degrees, signed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// GPS longitude (decimal degrees, signed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ParsedExif {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.camera_make.is_none()
            && self.camera_model.is_none()
            && self.lens.is_none()
            && self.focal_length.is_none()
            && self.aperture.is_none()
            && self.exposure_time.is_none()
            && self.iso.is_none()
            && self.taken_at.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// The result bundle returned by a successful ingest.
///
/// `width`/`height` are the ORIGINAL upload's pixel dimensions, not any
/// rendition's. Consumers rely on them for aspect-ratio layout even though
/// the displayed image is usually smaller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Stored asset identifier (file name or remote public id)
    pub filename: String,

    /// Publicly fetchable URL of the full-size rendition
    pub url: String,

    /// Publicly fetchable URL of the thumbnail rendition
    pub thumbnail_url: String,

    /// Original image width in pixels (pre-transcode)
    pub width: u32,

    /// Original image height in pixels (pre-transcode)
    pub height: u32,

    /// Extracted metadata
    pub exif: ParsedExif,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_exif_is_empty() {
        assert!(ParsedExif::default().is_empty());
    }

    #[test]
    fn test_single_field_not_empty() {
        let exif = ParsedExif {
            iso: Some(400),
            ..Default::default()
        };
        assert!(!exif.is_empty());
    }

    #[test]
    fn test_empty_fields_skipped_in_json() {
        let exif = ParsedExif {
            aperture: Some(2.8),
            ..Default::default()
        };
        let json = serde_json::to_string(&exif).unwrap();
        assert!(json.contains("\"aperture\":2.8"));
        assert!(!json.contains("camera_make"));
        assert!(!json.contains("latitude"));
    }

    #[test]
    fn test_upload_result_roundtrip() {
        let result = UploadResult {
            filename: "1712000000000-dsc-1234.jpg".to_string(),
            url: "/uploads/1712000000000-dsc-1234.jpg".to_string(),
            thumbnail_url: "/uploads/1712000000000-dsc-1234_thumb.jpg".to_string(),
            width: 6000,
            height: 4000,
            exif: ParsedExif::default(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let parsed: UploadResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.width, 6000);
        assert_eq!(parsed.height, 4000);
        assert_eq!(parsed.filename, result.filename);
    }
}
