use image::{GenericImageView, ImageOutputFormat, Rgb, RgbImage};
use profile_customizer::config::{ExportOptions, ImageOptions};
use profile_customizer::imaging::{BannerExporter, DataUrl, process_avatar, process_banner};
use profile_customizer::render;
use profile_customizer::settings::CustomizationSettings;
use profile_customizer::{ProfileData, TemplateCatalog};
use std::io::Cursor;

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, _| Rgb([(x % 256) as u8, 80, 160]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .unwrap();
    buf
}

#[test]
fn test_oversized_avatar_is_squared() {
    let processed = process_avatar(&png(3000, 1500), &ImageOptions::default()).unwrap();

    assert_eq!(processed.width, processed.height);
    assert!(processed.width <= 1024);

    let decoded = DataUrl::parse(&processed.data_url).unwrap();
    assert_eq!(decoded.mime, "image/jpeg");
    let image = image::load_from_memory(&decoded.data).unwrap();
    assert_eq!(image.dimensions(), (processed.width, processed.height));
}

#[test]
fn test_avatar_accepts_a_data_url() {
    let data_url = DataUrl::encode("image/png", &png(200, 400));
    let processed = process_avatar(data_url.as_bytes(), &ImageOptions::default()).unwrap();
    assert_eq!((processed.width, processed.height), (200, 200));
}

#[test]
fn test_wide_banner_is_scaled() {
    let processed = process_banner(&png(2400, 600), &ImageOptions::default()).unwrap();
    assert_eq!((processed.width, processed.height), (1200, 300));
}

#[test]
fn test_garbage_upload_is_rejected() {
    assert!(process_avatar(b"definitely not an image", &ImageOptions::default()).is_err());
}

#[test]
fn test_export_every_template() {
    let catalog = TemplateCatalog::builtin();
    let exporter = BannerExporter::new(ExportOptions::default()).unwrap();

    for template in catalog.all() {
        let spec = render::merge(template, &ProfileData::default(), &CustomizationSettings::new(template.id.clone()));
        let png = exporter.export_png(&spec).unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!(image.dimensions(), (1584, 396), "wrong size for {}", template.id);
    }
}

#[test]
fn test_export_saves_timestamped_file() {
    let dir = std::env::temp_dir().join(format!("profile-customizer-export-{}", std::process::id()));
    let catalog = TemplateCatalog::builtin();
    let spec = render::merge(
        catalog.default_template(),
        &ProfileData::default(),
        &CustomizationSettings::default(),
    );

    let path = BannerExporter::new(ExportOptions::default()).unwrap().save(&spec, &dir).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("profile_banner_"));
    assert!(name.ends_with(".png"));
    assert!(path.exists());

    let _ = std::fs::remove_dir_all(&dir);
}
