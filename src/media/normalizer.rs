//! Image validation and transcoding to WebP.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use thiserror::Error;

/// Input formats accepted for normalization.
pub const SUPPORTED_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Extension of the canonical output format.
pub const CANONICAL_EXTENSION: &str = "webp";

pub const DEFAULT_QUALITY: f32 = 85.0;
pub const DEFAULT_EFFORT: u8 = 4;
const MAX_EFFORT: u8 = 6;

/// Errors raised while converting an image. The source file is left intact.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("failed to write converted image: {0}")]
    Io(#[from] io::Error),
}

/// Returns `true` when the file decodes as one of [`SUPPORTED_FORMATS`].
///
/// The format is sniffed from the content, not the extension. Unreadable or
/// unknown files yield `false`.
pub fn is_supported_image(path: &Path) -> bool {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(_) => return false,
    };

    match reader.format() {
        Some(format) if SUPPORTED_FORMATS.contains(&format) => reader.into_dimensions().is_ok(),
        _ => false,
    }
}

/// Re-encode `source` as WebP into `output_dir`, keeping the file stem.
///
/// `quality` is clamped to 0..=100 and `effort` to 0..=6. The source is
/// removed only after the new file has been written; when the target is the
/// source itself (a `.webp` converted in place) it is simply replaced.
pub fn convert_to_canonical(
    source: &Path,
    output_dir: &Path,
    quality: f32,
    effort: u8,
) -> Result<PathBuf, ConversionError> {
    let image = ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ConversionError::Decode(e.to_string()))?;

    let encoded = encode_webp(&image, quality, effort)?;

    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ConversionError::Decode(format!("invalid file name {}", source.display())))?;
    let target = output_dir.join(format!("{stem}.{CANONICAL_EXTENSION}"));
    let staging = output_dir.join(format!(".{stem}.{CANONICAL_EXTENSION}.part"));

    fs::write(&staging, &encoded).map_err(|e| {
        let _ = fs::remove_file(&staging);
        ConversionError::Io(e)
    })?;
    if let Err(e) = fs::rename(&staging, &target) {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    if !same_file(source, &target) {
        if let Err(e) = fs::remove_file(source) {
            log::warn!(
                "Converted {} but failed to remove the original: {e}",
                source.display()
            );
        }
    }

    log::info!(
        "Converted {} to {}",
        source.display(),
        target.display()
    );

    Ok(target)
}

fn encode_webp(image: &DynamicImage, quality: f32, effort: u8) -> Result<Vec<u8>, ConversionError> {
    // The encoder only takes 8-bit RGB(A) buffers.
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
    let encoder = webp::Encoder::from_image(&rgba)
        .map_err(|e| ConversionError::Encode(e.to_string()))?;

    let mut config = webp::WebPConfig::new()
        .map_err(|_| ConversionError::Encode("invalid encoder configuration".to_string()))?;
    config.quality = quality.clamp(0.0, 100.0);
    config.method = i32::from(effort.min(MAX_EFFORT));

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| ConversionError::Encode(format!("{e:?}")))?;

    Ok(memory.to_vec())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Conversion policy applied to every accepted upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageNormalizer {
    pub quality: f32,
    pub effort: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            effort: DEFAULT_EFFORT,
        }
    }
}

impl ImageNormalizer {
    pub fn new(quality: f32, effort: u8) -> Self {
        Self { quality, effort }
    }

    pub fn is_supported_image(&self, path: &Path) -> bool {
        is_supported_image(path)
    }

    /// Convert `source` into its own directory with this policy.
    pub fn normalize(&self, source: &Path) -> Result<PathBuf, ConversionError> {
        let output_dir = source.parent().unwrap_or_else(|| Path::new("."));
        convert_to_canonical(source, output_dir, self.quality, self.effort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let image = RgbImage::from_fn(16, 12, |x, y| Rgb([(x * 15) as u8, (y * 20) as u8, 128]));
        image.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    fn decoded_format(path: &Path) -> Option<ImageFormat> {
        let reader = ImageReader::open(path).ok()?.with_guessed_format().ok()?;
        let format = reader.format();
        reader.decode().ok()?;
        format
    }

    #[test]
    fn detects_supported_images_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "photo.png");
        assert!(is_supported_image(&png));

        // Misleading extension still sniffs as PNG.
        let renamed = dir.path().join("photo.dat");
        fs::copy(&png, &renamed).unwrap();
        assert!(is_supported_image(&renamed));
    }

    #[test]
    fn rejects_corrupt_files_without_touching_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"definitely not an image").unwrap();

        assert!(!is_supported_image(&path));
        assert!(!is_supported_image(&dir.path().join("missing.png")));
        assert_eq!(fs::read(&path).unwrap(), b"definitely not an image");
    }

    #[test]
    fn converts_to_webp_and_removes_source() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "ring.png");

        let output = convert_to_canonical(&png, dir.path(), 85.0, 4).unwrap();

        assert_eq!(output, dir.path().join("ring.webp"));
        assert_eq!(decoded_format(&output), Some(ImageFormat::WebP));
        assert!(!png.exists());
    }

    #[test]
    fn failed_conversion_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"\x89PNG but truncated").unwrap();

        let err = convert_to_canonical(&path, dir.path(), 85.0, 4).unwrap_err();

        assert!(matches!(err, ConversionError::Decode(_)));
        assert!(path.exists());
        assert!(!dir.path().join("broken.webp").exists());
    }

    #[test]
    fn reconverting_webp_in_place_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "pendant.png");
        let webp = convert_to_canonical(&png, dir.path(), 85.0, 4).unwrap();

        let again = ImageNormalizer::new(60.0, 6).normalize(&webp).unwrap();

        assert_eq!(again, webp);
        assert_eq!(decoded_format(&again), Some(ImageFormat::WebP));
    }
}
