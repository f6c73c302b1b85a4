use url::Url;

/// Resource view of a URL. Purely descriptive: no network access, no
/// deletion semantics.
#[derive(Debug, Clone)]
pub struct UrlResource {
    url: Url,
}

impl UrlResource {
    pub(crate) fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Only `file:` URLs can be checked for existence without touching the
    /// network; every other scheme reports absent.
    pub fn exists(&self) -> bool {
        if self.url.scheme() != "file" {
            return false;
        }
        self.url
            .to_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }
}

/// Resource view of an in-memory string value.
#[derive(Debug, Clone)]
pub struct StringResource {
    value: String,
}

impl StringResource {
    pub(crate) fn new(value: String) -> Self {
        Self { value }
    }

    pub fn contents(&self) -> &str {
        &self.value
    }
}
