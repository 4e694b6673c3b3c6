use crate::error::{CustomizerError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// A decoded `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    /// Whether `url` uses the `data:` scheme
    pub fn is_data_url(url: &str) -> bool {
        url.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    }

    /// Parse a base64 or percent-encoded data URL
    pub fn parse(url: &str) -> Result<Self> {
        if !Self::is_data_url(url) {
            return Err(CustomizerError::InvalidDataUrl("missing data: scheme".to_string()));
        }
        let (meta, payload) = url[5..]
            .split_once(',')
            .ok_or_else(|| CustomizerError::InvalidDataUrl("missing ',' separator".to_string()))?;

        let mut params = meta.split(';');
        let mime = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("text/plain")
            .to_ascii_lowercase();
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let data = if is_base64 {
            let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD
                .decode(compact)
                .map_err(|e| CustomizerError::InvalidDataUrl(format!("bad base64 payload: {}", e)))?
        } else {
            urlencoding::decode_binary(payload.as_bytes()).into_owned()
        };

        Ok(Self { mime, data })
    }

    /// Base64 data URL for `data`
    pub fn encode(mime: &str, data: &[u8]) -> String {
        format!("data:{};base64,{}", mime, STANDARD.encode(data))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Self::encode(&self.mime, &self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64() {
        let url = DataUrl::encode("image/png", b"\x89PNG");
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = DataUrl::parse(&url).unwrap();
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.data, b"\x89PNG");
        assert!(parsed.is_image());
    }

    #[test]
    fn test_percent_encoded() {
        let parsed = DataUrl::parse("data:image/svg+xml,%3Csvg%2F%3E").unwrap();
        assert_eq!(parsed.mime, "image/svg+xml");
        assert_eq!(parsed.data, b"<svg/>");

        let plain = DataUrl::parse("data:,Hello%20World").unwrap();
        assert_eq!(plain.mime, "text/plain");
        assert_eq!(plain.data, b"Hello World");
    }

    #[test]
    fn test_invalid() {
        assert!(DataUrl::parse("https://example.com/a.png").is_err());
        assert!(DataUrl::parse("data:image/png;base64").is_err());
        assert!(DataUrl::parse("data:image/png;base64,@@@").is_err());
        assert!(!DataUrl::is_data_url("assets/backgrounds/corporate-pattern.png"));
    }
}
