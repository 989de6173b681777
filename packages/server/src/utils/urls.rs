use super::filename::percent_encode;

/// Resolves stored relative paths to absolute media URLs for one request.
#[derive(Debug, Clone)]
pub struct FileUrls {
    origin: String,
    media_prefix: String,
}

impl FileUrls {
    /// `origin` is `scheme://host`; `media_prefix` starts with `/` and has no
    /// trailing slash.
    pub fn new(origin: impl Into<String>, media_prefix: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            media_prefix: media_prefix.into(),
        }
    }

    pub fn file_url(&self, stored_path: &str) -> String {
        format!(
            "{}{}/{}",
            self.origin,
            self.media_prefix,
            percent_encode(stored_path, b"/")
        )
    }
}
