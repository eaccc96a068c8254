//! Binary PPM (`P6`) output for read-back framebuffers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError, RgbaImage};
use log::info;

use crate::error::Error;

/// Encode a `glReadPixels` RGBA buffer as a `P6` image.
///
/// GL returns rows bottom-up; they are flipped so the image is upright. The
/// alpha channel is dropped.
///
/// # Errors
///
/// [`Error::Image`] if `rgba` does not hold exactly `width * height` pixels
/// or the encoder fails.
pub fn encode_ppm<W: Write>(writer: W, width: u32, height: u32, rgba: &[u8]) -> Result<(), Error> {
    let mismatch =
        || ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch));
    if rgba.len() != width as usize * height as usize * 4 {
        return Err(mismatch().into());
    }
    let image = RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(mismatch)?;
    let rgb = DynamicImage::ImageRgba8(image).flipv().to_rgb8();

    PnmEncoder::new(writer)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
    Ok(())
}

/// Write a `glReadPixels` RGBA buffer to `path` as a `P6` image.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be created or flushed, otherwise see
/// [`encode_ppm`].
pub fn write_ppm_file(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<(), Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    encode_ppm(&mut writer, width, height, rgba)?;
    writer.flush()?;
    info!("wrote {width}x{height} image to {}", path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat};

    /// 2x2 RGBA, bottom row first as GL returns it.
    #[rustfmt::skip]
    const BOTTOM_UP: [u8; 16] = [
        255, 0, 0, 255,   0, 255, 0, 255, // bottom row
        0, 0, 255, 255,   9, 9, 9, 0,     // top row
    ];

    #[test]
    fn header_is_binary_pixmap() {
        let mut out = Vec::new();
        encode_ppm(&mut out, 2, 2, &BOTTOM_UP).unwrap();
        assert!(out.starts_with(b"P6"));
        // 2x2 RGB payload at the end.
        assert!(out.len() > 12);
    }

    #[test]
    fn rows_are_flipped_and_alpha_dropped() {
        let mut out = Vec::new();
        encode_ppm(&mut out, 2, 2, &BOTTOM_UP).unwrap();

        let decoded = image::load_from_memory_with_format(&out, ImageFormat::Pnm).unwrap();
        assert_eq!(decoded.dimensions(), (2, 2));
        let rgb = decoded.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [9, 9, 9]);
        assert_eq!(rgb.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 1).0, [0, 255, 0]);
        assert_eq!(&out[out.len() - 12..], &[0, 0, 255, 9, 9, 9, 255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut out = Vec::new();
        let err = encode_ppm(&mut out, 3, 3, &BOTTOM_UP).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut out = Vec::new();
        let err = encode_ppm(&mut out, 1, 2, &BOTTOM_UP).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert!(out.is_empty());
    }
}
