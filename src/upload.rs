//! Files attached to a single request, held as base64.

use base64::{Engine, engine::general_purpose::STANDARD};

/// An uploaded file, alive only for the request that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    /// Base64-encoded file bytes.
    pub content: String,
}

impl UploadedFile {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: STANDARD.encode(bytes),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// `data:<mime>;base64,<content>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.content)
    }

    /// The first `len` characters of the encoded content.
    pub fn preview(&self, len: usize) -> &str {
        // Base64 is ASCII, so any byte index is a char boundary.
        self.content.get(..len).unwrap_or(&self.content)
    }
}
