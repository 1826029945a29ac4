//! EXIF metadata extraction from upload bytes.
//!
//! Extraction runs on the original, unmodified bytes before any re-encoding,
//! since re-encoding can strip or alter the metadata segment. Metadata
//! absence is not an error: any parse failure yields an empty record.

use exif::{In, Reader, Tag, Value};
use std::io::Cursor;

use crate::types::ParsedExif;

/// Extracts EXIF metadata from uploaded images.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract EXIF data from raw image bytes.
    ///
    /// Never fails: images with no metadata segment, corrupt metadata, or
    /// unsupported containers produce `ParsedExif::default()`.
    pub fn extract(bytes: &[u8]) -> ParsedExif {
        Self::parse(bytes).unwrap_or_default()
    }

    /// Read the orientation flag (1-8 per EXIF spec), defaulting to 1.
    ///
    /// Kept separate from `ParsedExif`: orientation drives the transcoder's
    /// auto-rotate and is meaningless once the rendition is upright.
    pub fn orientation(bytes: &[u8]) -> u32 {
        let mut cursor = Cursor::new(bytes);
        let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
            return 1;
        };
        Self::get_u32(&exif, Tag::Orientation).unwrap_or(1)
    }

    fn parse(bytes: &[u8]) -> Option<ParsedExif> {
        let mut cursor = Cursor::new(bytes);
        let exif = Reader::new().read_from_container(&mut cursor).ok()?;

        Some(ParsedExif {
            camera_make: Self::get_trimmed_string(&exif, Tag::Make),
            camera_model: Self::get_trimmed_string(&exif, Tag::Model),
            lens: Self::get_trimmed_string(&exif, Tag::LensModel),
            focal_length: Self::get_rational_f32(&exif, Tag::FocalLength),
            aperture: Self::get_rational_f32(&exif, Tag::FNumber),
            exposure_time: Self::get_exposure_time(&exif),
            iso: Self::get_u32(&exif, Tag::PhotographicSensitivity),
            taken_at: Self::get_datetime(&exif),
            latitude: Self::get_gps_coord(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
            longitude: Self::get_gps_coord(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
        })
    }

    /// Get a string field, quote- and whitespace-trimmed.
    ///
    /// Empty-after-trim is treated as absent, not as an empty string.
    fn get_trimmed_string(exif: &exif::Exif, tag: Tag) -> Option<String> {
        let field = exif.get_field(tag, In::PRIMARY)?;
        let s = field.display_value().to_string();
        let trimmed = s.trim_matches('"').trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Get a u32 field from EXIF data.
    fn get_u32(exif: &exif::Exif, tag: Tag) -> Option<u32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
    }

    /// Get a rational field as f32 (focal length, f-number).
    fn get_rational_f32(exif: &exif::Exif, tag: Tag) -> Option<f32> {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) => v.first().map(|r| r.to_f64() as f32),
                _ => None,
            })
    }

    /// Get the exposure time in photographer-friendly display form.
    fn get_exposure_time(exif: &exif::Exif) -> Option<String> {
        let field = exif.get_field(Tag::ExposureTime, In::PRIMARY)?;
        let seconds = match &field.value {
            Value::Rational(v) => v.first().map(|r| r.to_f64())?,
            _ => return None,
        };
        if seconds <= 0.0 || !seconds.is_finite() {
            return None;
        }
        Some(format_exposure_time(seconds))
    }

    /// Get the capture datetime, preferring DateTimeOriginal over DateTime.
    ///
    /// Normalized to ISO-8601 `YYYY-MM-DDTHH:MM:SS`.
    fn get_datetime(exif: &exif::Exif) -> Option<String> {
        let field = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;
        let ascii = match &field.value {
            Value::Ascii(v) => v.first()?,
            _ => return None,
        };
        let dt = exif::DateTime::from_ascii(ascii).ok()?;
        Some(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
        ))
    }

    /// Get GPS coordinate, converting from degrees/minutes/seconds to decimal.
    fn get_gps_coord(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let coord = exif.get_field(coord_tag, In::PRIMARY)?;
        let reference = exif.get_field(ref_tag, In::PRIMARY)?;

        let degrees = Self::parse_gps_rationals(&coord.value)?;
        let ref_str = reference.display_value().to_string();

        // Apply sign based on reference (N/S for lat, E/W for lon)
        let sign = if ref_str.contains('S') || ref_str.contains('W') {
            -1.0
        } else {
            1.0
        };

        Some(sign * degrees)
    }

    /// Parse GPS rationals (degrees, minutes, seconds) to decimal degrees.
    fn parse_gps_rationals(value: &Value) -> Option<f64> {
        match value {
            Value::Rational(rationals) if rationals.len() >= 3 => {
                let degrees = rationals[0].to_f64();
                let minutes = rationals[1].to_f64();
                let seconds = rationals[2].to_f64();
                Some(degrees + minutes / 60.0 + seconds / 3600.0)
            }
            _ => None,
        }
    }
}

/// Format an exposure time in seconds for display.
///
/// Values of a second or more render as "2s"; shorter exposures render as
/// the conventional fraction, e.g. 0.002 becomes "1/500". One-way transform.
pub fn format_exposure_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{}s", seconds)
    } else {
        format!("1/{}", (1.0 / seconds).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_without_metadata() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(4, 4);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// A minimal TIFF container carrying a typical camera metadata block.
    fn tiff_with_metadata() -> Vec<u8> {
        use exif::experimental::Writer;
        use exif::{Field, Rational};

        let make = Field {
            tag: Tag::Make,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"NIKON CORPORATION ".to_vec()]),
        };
        let model = Field {
            tag: Tag::Model,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"NIKON Z 6_2".to_vec()]),
        };
        let f_number = Field {
            tag: Tag::FNumber,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![Rational { num: 28, denom: 10 }]),
        };
        let focal_length = Field {
            tag: Tag::FocalLength,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![Rational { num: 35, denom: 1 }]),
        };
        let iso = Field {
            tag: Tag::PhotographicSensitivity,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![400]),
        };
        let exposure = Field {
            tag: Tag::ExposureTime,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![Rational { num: 1, denom: 250 }]),
        };
        let taken_at = Field {
            tag: Tag::DateTimeOriginal,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"2024:03:15 10:00:00".to_vec()]),
        };

        let mut writer = Writer::new();
        writer.push_field(&make);
        writer.push_field(&model);
        writer.push_field(&f_number);
        writer.push_field(&focal_length);
        writer.push_field(&iso);
        writer.push_field(&exposure);
        writer.push_field(&taken_at);

        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_extract_populated_fields() {
        let exif = MetadataExtractor::extract(&tiff_with_metadata());

        assert_eq!(exif.camera_make.as_deref(), Some("NIKON CORPORATION"));
        assert_eq!(exif.camera_model.as_deref(), Some("NIKON Z 6_2"));
        assert!((exif.aperture.unwrap() - 2.8).abs() < 1e-4);
        assert!((exif.focal_length.unwrap() - 35.0).abs() < 1e-4);
        assert_eq!(exif.iso, Some(400));
        assert_eq!(exif.exposure_time.as_deref(), Some("1/250"));
        assert_eq!(exif.taken_at.as_deref(), Some("2024-03-15T10:00:00"));
        assert!(exif.lens.is_none());
        assert!(exif.latitude.is_none());
        assert!(!exif.is_empty());
    }

    #[test]
    fn test_format_exposure_fraction() {
        assert_eq!(format_exposure_time(0.002), "1/500");
        assert_eq!(format_exposure_time(0.004), "1/250");
        assert_eq!(format_exposure_time(0.5), "1/2");
    }

    #[test]
    fn test_format_exposure_whole_seconds() {
        assert_eq!(format_exposure_time(2.0), "2s");
        assert_eq!(format_exposure_time(1.0), "1s");
        assert_eq!(format_exposure_time(30.0), "30s");
    }

    #[test]
    fn test_format_exposure_fractional_seconds() {
        assert_eq!(format_exposure_time(1.5), "1.5s");
    }

    #[test]
    fn test_extract_no_metadata_segment() {
        let exif = MetadataExtractor::extract(&png_without_metadata());
        assert!(exif.is_empty());
    }

    #[test]
    fn test_extract_corrupt_bytes() {
        let exif = MetadataExtractor::extract(&[0xFF, 0xD8, 0xFF, 0x00, 0x12, 0x34]);
        assert!(exif.is_empty());
    }

    #[test]
    fn test_extract_empty_input() {
        let exif = MetadataExtractor::extract(&[]);
        assert!(exif.is_empty());
    }

    #[test]
    fn test_orientation_defaults_to_upright() {
        assert_eq!(MetadataExtractor::orientation(&png_without_metadata()), 1);
        assert_eq!(MetadataExtractor::orientation(&[]), 1);
    }
}
