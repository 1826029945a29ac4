//! Image transcoding: decode, auto-rotate, shrink-to-fit, JPEG encode.
//!
//! Renditions only ever shrink; an image already within the configured bound
//! is re-encoded at its own size. Intrinsic dimensions are recorded before
//! any resize so the catalog can lay out by the original aspect ratio.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use crate::config::RenditionConfig;
use crate::error::IngestError;

/// A single encoded rendition.
#[derive(Debug)]
pub struct EncodedRendition {
    /// JPEG bytes
    pub bytes: Vec<u8>,
    /// Rendition width in pixels
    pub width: u32,
    /// Rendition height in pixels
    pub height: u32,
}

/// Result of transcoding one upload.
#[derive(Debug)]
pub struct TranscodeOutput {
    /// Intrinsic width of the source image, measured before any resize
    pub original_width: u32,
    /// Intrinsic height of the source image, measured before any resize
    pub original_height: u32,
    /// Full-size web rendition
    pub master: EncodedRendition,
    /// Thumbnail rendition, absent when the backend derives it on the fly
    pub thumbnail: Option<EncodedRendition>,
}

/// Transcodes uploads into web renditions.
pub struct Transcoder {
    config: RenditionConfig,
}

impl Transcoder {
    /// Create a new transcoder with the given rendition settings.
    pub fn new(config: RenditionConfig) -> Self {
        Self { config }
    }

    /// Transcode upload bytes into renditions.
    ///
    /// Decoding and encoding are CPU-bound and run under `spawn_blocking`.
    /// An undecodable input is a hard error that fails the whole upload.
    pub async fn transcode(
        &self,
        bytes: Vec<u8>,
        name: &str,
        orientation: u32,
        want_thumbnail: bool,
    ) -> Result<TranscodeOutput, IngestError> {
        let config = self.config.clone();
        let name_owned = name.to_string();

        tokio::task::spawn_blocking(move || {
            Self::transcode_sync(&config, bytes, &name_owned, orientation, want_thumbnail)
        })
        .await
        .map_err(|e| IngestError::Decode {
            name: name.to_string(),
            message: format!("Task join error: {}", e),
        })?
    }

    fn transcode_sync(
        config: &RenditionConfig,
        bytes: Vec<u8>,
        name: &str,
        orientation: u32,
        want_thumbnail: bool,
    ) -> Result<TranscodeOutput, IngestError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| IngestError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let image = reader.decode().map_err(|e| IngestError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let (original_width, original_height) = image.dimensions();

        let image = apply_orientation(image, orientation);

        // Scale very large inputs down first to stay under remote-host
        // size ceilings before the rendition resizes.
        let bound = config.pre_resize_bound;
        let image = if image.width() > bound || image.height() > bound {
            image.resize(bound, bound, FilterType::Lanczos3)
        } else {
            image
        };

        let master_img = shrink_to_width(&image, config.max_width);
        let master = encode_jpeg(&master_img, config.quality, name)?;

        let thumbnail = if want_thumbnail {
            let thumb_img = shrink_to_width(&image, config.thumbnail_width);
            Some(encode_jpeg(&thumb_img, config.thumbnail_quality, name)?)
        } else {
            None
        };

        Ok(TranscodeOutput {
            original_width,
            original_height,
            master,
            thumbnail,
        })
    }
}

/// Resize to fit a maximum width, preserving aspect ratio. Never enlarges.
fn shrink_to_width(image: &DynamicImage, max_width: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= max_width {
        return image.clone();
    }
    let target_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
    image.resize(max_width, target_height, FilterType::Lanczos3)
}

/// Encode to JPEG at the given quality, flattening any alpha channel.
fn encode_jpeg(
    image: &DynamicImage,
    quality: u8,
    name: &str,
) -> Result<EncodedRendition, IngestError> {
    let (width, height) = image.dimensions();
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| IngestError::Encode {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    Ok(EncodedRendition {
        bytes: buffer.into_inner(),
        width,
        height,
    })
}

/// Apply the EXIF orientation flag so the image is upright.
fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.fliph().rotate90(),
        6 => image.rotate90(),
        7 => image.fliph().rotate270(),
        8 => image.rotate270(),
        _ => image,
    }
}
