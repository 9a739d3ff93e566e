use url::Url;

pub const DEFAULT_THUMBNAIL_BASE: &str = "https://picsum.photos";
pub const THUMBNAIL_WIDTH: u32 = 800;
pub const THUMBNAIL_HEIGHT: u32 = 450;

/// Public placeholder-image host addressed as `{base}/seed/{seed}/{w}/{h}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSource {
    pub base_url: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSource {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_THUMBNAIL_BASE.to_string(),
            width: THUMBNAIL_WIDTH,
            height: THUMBNAIL_HEIGHT,
        }
    }
}

impl ThumbnailSource {
    pub fn with_base(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn url_for_seed(&self, seed: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.trim_end_matches('/');
        Url::parse(&format!(
            "{base}/seed/{seed}/{w}/{h}",
            w = self.width,
            h = self.height
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::ThumbnailSource;

    #[test]
    fn default_source_uses_fixed_dimensions() {
        let url = ThumbnailSource::default()
            .url_for_seed("1712345678901")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://picsum.photos/seed/1712345678901/800/450"
        );
    }

    #[test]
    fn trailing_slash_in_base_is_ignored() {
        let url = ThumbnailSource::with_base("http://127.0.0.1:9000/")
            .url_for_seed("7")
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/seed/7/800/450");
    }

    #[test]
    fn invalid_base_is_an_error() {
        assert!(ThumbnailSource::with_base("not a url")
            .url_for_seed("1")
            .is_err());
    }
}
