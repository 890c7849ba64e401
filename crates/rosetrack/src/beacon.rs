use rosetrack_common::pixel::PIXEL_PATH;
use url::{Url, form_urlencoded};

/// Builds `<img>` fallback urls for the tracking pixel endpoint.
#[derive(Debug, Clone, Default)]
pub struct PixelBeacon {
    base: Option<Url>,
}

impl PixelBeacon {
    /// Beacon producing path-only urls, resolved by the page against its own origin.
    pub const fn relative() -> Self {
        Self { base: None }
    }

    /// Beacon pointing at the server at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute url.
    pub fn with_base(base: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            anyhow::bail!("pixel base {base} cannot carry a path");
        }
        Ok(Self { base: Some(base) })
    }

    pub const fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// `.../api/pixel?page=<page>&t=<timestamp_ms>`, percent-encoded.
    pub fn url(&self, page: &str, timestamp_ms: i64) -> String {
        let t = timestamp_ms.to_string();
        match self.base {
            Some(ref base) => {
                let mut url = base.clone();
                url.set_path(PIXEL_PATH);
                url.query_pairs_mut()
                    .clear()
                    .append_pair("page", page)
                    .append_pair("t", &t);
                url.into()
            }
            None => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("page", page)
                    .append_pair("t", &t)
                    .finish();
                format!("{PIXEL_PATH}?{query}")
            }
        }
    }
}
