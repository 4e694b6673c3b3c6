use crate::config::ExportOptions;
use crate::error::{CustomizerError, Result};
use crate::imaging::color::{FALLBACK_GRAY, LinearGradient, parse_color};
use crate::imaging::{DataUrl, decode_image};
use crate::render::{RenderSpec, TextDirective};
use crate::template::{
    BackgroundKind, HorizontalAlign, ProfilePicturePosition, TextPosition, VerticalAlign,
};
use chrono::{DateTime, Local, TimeZone};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut, text_size};
use indexmap::IndexMap;
use rusttype::{Font, Scale};
use std::path::{Path, PathBuf};

/// Spacing between the banner edge and placed content, before scaling
const EDGE_MARGIN: f32 = 16.0;

/// Spacing between the banner edge and the avatar, before scaling
const AVATAR_MARGIN: f32 = 20.0;

/// Gap between stacked text lines, before scaling
const LINE_GAP: f32 = 4.0;

/// `prefix_YYYYMMDD_HHMM.ext` for the current local time
pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
    filename_at(prefix, extension, &Local::now())
}

/// `prefix_YYYYMMDD_HHMM.ext` for a given instant
pub fn filename_at<Tz: TimeZone>(prefix: &str, extension: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M"), extension)
}

/// Paints a render spec into a fixed-size PNG
pub struct BannerExporter {
    options: ExportOptions,
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for BannerExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BannerExporter")
            .field("options", &self.options)
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl BannerExporter {
    /// Create an exporter, loading the configured font if any
    pub fn new(options: ExportOptions) -> Result<Self> {
        let font = match &options.font_path {
            Some(path) => Some(load_font(path)?),
            None => None,
        };
        Ok(Self { options, font })
    }

    /// Builder method: draw text with `font`
    pub fn with_font(mut self, font: Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Paint the banner
    pub fn render(&self, spec: &RenderSpec) -> RgbaImage {
        let mut canvas = self.background(spec);
        self.draw_text(&mut canvas, &spec.text_elements);
        self.draw_profile_picture(&mut canvas, spec);
        canvas
    }

    /// Paint the banner and encode it as PNG
    pub fn export_png(&self, spec: &RenderSpec) -> Result<Vec<u8>> {
        let canvas = self.render(spec);
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf).write_image(canvas.as_raw(), canvas.width(), canvas.height(), ColorType::Rgba8)?;
        Ok(buf)
    }

    /// Paint the banner as a PNG data URL
    pub fn export_data_url(&self, spec: &RenderSpec) -> Result<String> {
        Ok(DataUrl::encode("image/png", &self.export_png(spec)?))
    }

    /// Write the banner into `dir` under a timestamped name and return the path
    pub fn save(&self, spec: &RenderSpec, dir: &Path) -> Result<PathBuf> {
        let png = self.export_png(spec)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(timestamped_filename(&self.options.filename_prefix, "png"));
        std::fs::write(&path, png)?;
        log::info!("Exported banner to {}", path.display());
        Ok(path)
    }

    fn scale(&self, value: f32) -> f32 {
        value * self.options.text_scale
    }

    fn background(&self, spec: &RenderSpec) -> RgbaImage {
        let (width, height) = (self.options.width, self.options.height);
        let value = spec.background.value.as_str();

        match spec.background.kind {
            BackgroundKind::Color => RgbaImage::from_pixel(width, height, parse_color(value).unwrap_or(FALLBACK_GRAY)),
            BackgroundKind::Gradient => match LinearGradient::parse(value) {
                Some(gradient) => RgbaImage::from_fn(width, height, |x, y| gradient.sample(x, y, width, height)),
                None => {
                    log::warn!("Unsupported gradient '{}', painting gray", value);
                    RgbaImage::from_pixel(width, height, FALLBACK_GRAY)
                }
            },
            BackgroundKind::Image if DataUrl::is_data_url(value) => match decode_image(value.as_bytes()) {
                Ok(image) => image.resize_to_fill(width, height, FilterType::Lanczos3).to_rgba8(),
                Err(e) => {
                    log::warn!("Background image could not be decoded: {}", e);
                    RgbaImage::from_pixel(width, height, FALLBACK_GRAY)
                }
            },
            BackgroundKind::Image => {
                log::debug!("Background image '{}' is not embedded, painting gray", value);
                RgbaImage::from_pixel(width, height, FALLBACK_GRAY)
            }
        }
    }

    fn draw_text(&self, canvas: &mut RgbaImage, elements: &[TextDirective]) {
        let Some(font) = &self.font else {
            if !elements.is_empty() {
                log::warn!("No font configured, exporting without text");
            }
            return;
        };

        // Elements sharing a grid cell are stacked in template order
        let mut cells: IndexMap<TextPosition, Vec<&TextDirective>> = IndexMap::new();
        for element in elements.iter().filter(|e| !e.content.trim().is_empty()) {
            cells.entry(element.position).or_default().push(element);
        }

        let (width, height) = (canvas.width() as i32, canvas.height() as i32);
        let margin = self.scale(EDGE_MARGIN) as i32;
        let gap = self.scale(LINE_GAP) as i32;

        for (position, stack) in cells {
            let lines: Vec<(&TextDirective, Scale, (i32, i32))> = stack
                .into_iter()
                .map(|element| {
                    let scale = Scale::uniform(self.scale(element.font_size as f32));
                    (element, scale, text_size(scale, font, &element.content))
                })
                .collect();

            let block_height: i32 =
                lines.iter().map(|(_, _, (_, h))| *h).sum::<i32>() + gap * (lines.len() as i32 - 1).max(0);
            let mut y = match position.vertical() {
                VerticalAlign::Top => margin,
                VerticalAlign::Middle => (height - block_height) / 2,
                VerticalAlign::Bottom => height - margin - block_height,
            };

            for (element, scale, (w, h)) in lines {
                let x = match position.horizontal() {
                    HorizontalAlign::Left => margin,
                    HorizontalAlign::Center => (width - w) / 2,
                    HorizontalAlign::Right => width - margin - w,
                };
                let color = parse_color(&element.color).unwrap_or(Rgba([255, 255, 255, 255]));
                draw_text_mut(canvas, color, x, y, scale, font, &element.content);
                y += h + gap;
            }
        }
    }

    fn draw_profile_picture(&self, canvas: &mut RgbaImage, spec: &RenderSpec) {
        let picture = &spec.profile_picture;
        if !picture.show {
            return;
        }

        let diameter = self.scale(picture.size.diameter() as f32).round() as u32;
        let radius = (diameter / 2) as i32;
        let margin = self.scale(AVATAR_MARGIN) as i32;
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);

        let left = match picture.position {
            ProfilePicturePosition::Left => margin,
            ProfilePicturePosition::Center => (width - diameter as i32) / 2,
            ProfilePicturePosition::Right => width - margin - diameter as i32,
        };
        let top = height - margin - diameter as i32;
        let center = (left + radius, top + radius);

        if let Some(border) = &picture.border {
            let border_width = self.scale(border.width as f32).round() as i32;
            let color = parse_color(&border.color).unwrap_or(Rgba([255, 255, 255, 255]));
            draw_filled_circle_mut(canvas, center, radius + border_width, color);
        }

        let avatar = picture
            .image
            .as_deref()
            .filter(|url| DataUrl::is_data_url(url))
            .and_then(|url| match decode_image(url.as_bytes()) {
                Ok(image) => Some(image.resize_to_fill(diameter, diameter, FilterType::Lanczos3).to_rgba8()),
                Err(e) => {
                    log::warn!("Profile picture could not be decoded: {}", e);
                    None
                }
            });

        let Some(avatar) = avatar else {
            draw_filled_circle_mut(canvas, center, radius, FALLBACK_GRAY);
            return;
        };

        let r2 = (radius * radius) as i64;
        for (ax, ay, pixel) in avatar.enumerate_pixels() {
            let (dx, dy) = (ax as i64 - radius as i64, ay as i64 - radius as i64);
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let (cx, cy) = (left + ax as i32, top + ay as i32);
            if cx >= 0 && cy >= 0 && cx < width && cy < height {
                canvas.put_pixel(cx as u32, cy as u32, *pixel);
            }
        }
    }
}

/// Load a TrueType/OpenType font from disk
pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = std::fs::read(path)
        .map_err(|e| CustomizerError::Config(format!("Failed to read font {}: {}", path.display(), e)))?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| CustomizerError::Config(format!("{} is not a usable font", path.display())))
}
