use crate::config::ImageOptions;
use crate::error::{CustomizerError, Result};
use crate::imaging::DataUrl;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView};

/// An upload after resizing, ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub width: u32,
    pub height: u32,
    pub data_url: String,
}

/// Dimensions of `(width, height)` scaled to fit inside `max`×`max`; smaller images are unchanged
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    if width > height {
        (max, scaled(height, max, width))
    } else {
        (scaled(width, max, height), max)
    }
}

/// Dimensions scaled down to `max_width`; narrower images are unchanged
pub fn limit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        (width, height)
    } else {
        (max_width, scaled(height, max_width, width))
    }
}

fn scaled(value: u32, numerator: u32, denominator: u32) -> u32 {
    let result = (value as f64 * numerator as f64 / denominator as f64).round() as u32;
    result.max(1)
}

/// Decode an image from raw bytes or from a data URL string
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if let Some(text) = std::str::from_utf8(bytes).ok().filter(|t| DataUrl::is_data_url(t)) {
        let url = DataUrl::parse(text.trim())?;
        return Ok(image::load_from_memory(&url.data)?);
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Encode as baseline JPEG; alpha is dropped
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(buf)
}

fn finish(image: DynamicImage, quality: u8) -> Result<ProcessedImage> {
    let (width, height) = image.dimensions();
    let jpeg = encode_jpeg(&image, quality)?;
    Ok(ProcessedImage {
        width,
        height,
        data_url: DataUrl::encode("image/jpeg", &jpeg),
    })
}

/// Avatar upload: fit within the configured square, center-crop to a square, JPEG
pub fn process_avatar(bytes: &[u8], options: &ImageOptions) -> Result<ProcessedImage> {
    let image = decode_image(bytes)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CustomizerError::ImageFailed("empty image".to_string()));
    }

    let (fit_w, fit_h) = fit_within(width, height, options.avatar_max_size);
    let resized = if (fit_w, fit_h) == (width, height) {
        image
    } else {
        image.resize_exact(fit_w, fit_h, FilterType::Lanczos3)
    };

    let side = fit_w.min(fit_h);
    let square = resized.crop_imm((fit_w - side) / 2, (fit_h - side) / 2, side, side);

    log::debug!("Avatar {}x{} -> {}x{}", width, height, side, side);
    finish(square, options.jpeg_quality)
}

/// Banner upload: scale down to the configured maximum width, JPEG
pub fn process_banner(bytes: &[u8], options: &ImageOptions) -> Result<ProcessedImage> {
    let image = decode_image(bytes)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CustomizerError::ImageFailed("empty image".to_string()));
    }

    let (new_w, new_h) = limit_width(width, height, options.banner_max_width);
    let resized = if new_w == width {
        image
    } else {
        image.resize_exact(new_w, new_h, FilterType::Lanczos3)
    };

    log::debug!("Banner image {}x{} -> {}x{}", width, height, new_w, new_h);
    finish(resized, options.jpeg_quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 102, 194]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(3000, 1500, 1024), (1024, 512));
        assert_eq!(fit_within(1500, 3000, 1024), (512, 1024));
        assert_eq!(fit_within(800, 600, 1024), (800, 600));
        assert_eq!(limit_width(2400, 600, 1200), (1200, 300));
        assert_eq!(limit_width(1000, 600, 1200), (1000, 600));
    }

    #[test]
    fn test_avatar_is_square_and_bounded() {
        let processed = process_avatar(&png(3000, 1500), &ImageOptions::default()).unwrap();

        assert_eq!(processed.width, processed.height);
        assert!(processed.width <= 1024);
        assert!(processed.data_url.starts_with("data:image/jpeg;base64,"));

        let decoded = decode_image(processed.data_url.as_bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (512, 512));
    }

    #[test]
    fn test_banner_width_limit() {
        let processed = process_banner(&png(2400, 400), &ImageOptions::default()).unwrap();
        assert_eq!((processed.width, processed.height), (1200, 200));
    }

    #[test]
    fn test_undecodable_upload() {
        let err = process_avatar(b"not an image", &ImageOptions::default()).unwrap_err();
        assert!(matches!(err, CustomizerError::ImageFailed(_)));
    }
}
