//! Image handling
//!
//! - data_url: `data:` URL encoding and decoding
//! - upload: resizing of avatar and banner uploads
//! - color: CSS color and linear-gradient parsing
//! - export: painting a render spec into a PNG banner

pub mod color;
pub mod data_url;
pub mod export;
pub mod upload;

pub use color::{LinearGradient, parse_color};
pub use data_url::DataUrl;
pub use export::{BannerExporter, filename_at, load_font, timestamped_filename};
pub use upload::{ProcessedImage, decode_image, encode_jpeg, fit_within, limit_width, process_avatar, process_banner};
