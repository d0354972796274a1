use std::fmt;

use async_trait::async_trait;

/// Binary image attached to a create or update request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Durable location of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media host unreachable: {0}")]
    Transport(String),
    #[error("media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected media host response: {0}")]
    InvalidResponse(String),
}

/// Hosted image library used for listing photos.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Uploads once; callers do not retry.
    async fn upload(&self, image: ImagePayload) -> Result<UploadedImage, MediaError>;

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Derives the public identifier of a hosted image from its delivery URL.
///
/// Takes everything after the first `/upload/`, dropping a leading `v<digits>/`
/// version segment. Returns `None` when the URL has no such path.
pub fn public_id_from_url(url: &str) -> Option<&str> {
    const MARKER: &str = "/upload/";

    let start = url.find(MARKER)? + MARKER.len();
    let rest = &url[start..];

    let unversioned = rest
        .strip_prefix('v')
        .and_then(|tail| {
            let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            tail[digits..].strip_prefix('/')
        })
        .filter(|tail| !tail.is_empty());

    Some(unversioned.unwrap_or(rest)).filter(|id| !id.is_empty())
}
