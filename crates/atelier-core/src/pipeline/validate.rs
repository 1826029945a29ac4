//! Upload validation before decoding.

use crate::config::LimitsConfig;
use crate::error::IngestError;

/// Validates uploads before the full decode is attempted.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation on upload bytes.
    ///
    /// Checks:
    /// - Upload is not empty
    /// - Upload size is within limits
    /// - Bytes start with valid image magic bytes
    pub fn validate(&self, bytes: &[u8], name: &str) -> Result<(), IngestError> {
        if bytes.is_empty() {
            return Err(IngestError::EmptyUpload {
                name: name.to_string(),
            });
        }

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if bytes.len() as u64 > max_bytes {
            return Err(IngestError::FileTooLarge {
                name: name.to_string(),
                size_mb: bytes.len() as u64 / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let mut header = [0u8; 12];
        let len = bytes.len().min(12);
        header[..len].copy_from_slice(&bytes[..len]);

        if len < 4 || !Self::is_valid_image_header(&header, len) {
            return Err(IngestError::UnrecognizedFormat {
                name: name.to_string(),
            });
        }

        Ok(())
    }

    /// Check if the header bytes match known image formats.
    fn is_valid_image_header(header: &[u8; 12], bytes_read: usize) -> bool {
        if bytes_read < 4 {
            return false;
        }

        // JPEG: FF D8 FF
        if header[0] == 0xFF && header[1] == 0xD8 && header[2] == 0xFF {
            return true;
        }

        // PNG: 89 50 4E 47
        if header[0] == 0x89 && header[1] == b'P' && header[2] == b'N' && header[3] == b'G' {
            return true;
        }

        // GIF: GIF8
        if header[0] == b'G' && header[1] == b'I' && header[2] == b'F' && header[3] == b'8' {
            return true;
        }

        // WebP: RIFF....WEBP
        if header[0] == b'R' && header[1] == b'I' && header[2] == b'F' && header[3] == b'F' {
            if bytes_read >= 12 {
                return header[8] == b'W'
                    && header[9] == b'E'
                    && header[10] == b'B'
                    && header[11] == b'P';
            }
            // Could be WebP, allow it to proceed
            return true;
        }

        // BMP: BM
        if header[0] == b'B' && header[1] == b'M' {
            return true;
        }

        // TIFF: II (little-endian) or MM (big-endian) followed by version 42
        let is_tiff_le =
            header[0] == b'I' && header[1] == b'I' && header[2] == 0x2A && header[3] == 0x00;
        let is_tiff_be =
            header[0] == b'M' && header[1] == b'M' && header[2] == 0x00 && header[3] == 0x2A;
        if is_tiff_le || is_tiff_be {
            return true;
        }

        // HEIC/HEIF/AVIF: ftyp box at offset 4
        if bytes_read >= 12
            && header[4] == b'f'
            && header[5] == b't'
            && header[6] == b'y'
            && header[7] == b'p'
        {
            return true;
        }

        false
    }
}
