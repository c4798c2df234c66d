/// Prefix of a local indirection token. The rest of the token is the
/// key-value store key holding the image payload.
pub const LOCAL_SCHEME: &str = "local://";

/// Public prefix under which the server exposes uploaded files.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Classification of an image reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// `local://<key>`; carries the key.
    Local(&'a str),
    /// Server-relative upload path, e.g. `/uploads/hero-1-1700000000000.jpg`.
    Upload(&'a str),
    /// Anything else: absolute URLs, data URLs, unknown formats.
    External(&'a str),
    Empty,
}

impl<'a> ImageRef<'a> {
    pub fn parse(value: &'a str) -> Self {
        if value.is_empty() {
            ImageRef::Empty
        } else if let Some(key) = value.strip_prefix(LOCAL_SCHEME) {
            ImageRef::Local(key)
        } else if value.starts_with(UPLOADS_PREFIX) {
            ImageRef::Upload(value)
        } else {
            ImageRef::External(value)
        }
    }

    /// Key of a local token, `None` for every other kind.
    pub fn local_key(value: &'a str) -> Option<&'a str> {
        match Self::parse(value) {
            ImageRef::Local(key) => Some(key),
            _ => None,
        }
    }

    /// Builds the token referencing `key`.
    pub fn local_token(key: &str) -> String {
        format!("{LOCAL_SCHEME}{key}")
    }
}
