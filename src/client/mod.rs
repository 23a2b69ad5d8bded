//! Terminal counterpart of the browser islands: a typed client for the
//! HTTP API plus the chat session state it drives.

pub mod session;

use std::path::Path;

use anyhow::{Context, Result, bail};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::api::error::ErrorResponse;
use crate::api::types::{
    EmailRequest, HealthResponse, ResultResponse, TitleRequest, TitleResponse, TranslateRequest,
};
use crate::conversation::Message;

pub use session::ChatSession;

/// A file picked for upload, kept as raw bytes until it is sent.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(name, mime_type, bytes))
    }

    fn to_part(&self) -> Result<Part> {
        Part::bytes(self.bytes.clone())
            .file_name(self.name.clone())
            .mime_str(&self.mime_type)
            .with_context(|| format!("invalid MIME type for {}: {}", self.name, self.mime_type))
    }
}

/// Talks to a running `scribe serve`.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;
        read_json(resp).await
    }

    pub async fn translate(&self, input: &str, target_language: Option<&str>) -> Result<String> {
        let body = TranslateRequest {
            input: input.to_string(),
            target_language: target_language.map(str::to_string),
        };
        let resp = self.post_json("/api/translate", &body).await?;
        Ok(read_json::<ResultResponse>(resp).await?.result)
    }

    pub async fn email(&self, request: &EmailRequest) -> Result<String> {
        let resp = self.post_json("/api/email", request).await?;
        Ok(read_json::<ResultResponse>(resp).await?.result)
    }

    pub async fn code_assist(&self, prompt: &str, images: &[Attachment]) -> Result<String> {
        let mut form = Form::new().text("prompt", prompt.to_string());
        for (i, image) in images.iter().enumerate() {
            form = form.part(format!("image{i}"), image.to_part()?);
        }
        let resp = self.post_form("/api/code-assist", form).await?;
        Ok(read_json::<ResultResponse>(resp).await?.result)
    }

    pub async fn chat(&self, messages: &[Message], files: &[Attachment]) -> Result<String> {
        let messages = serde_json::to_string(messages).context("failed to encode messages")?;
        let mut form = Form::new().text("messages", messages);
        for (i, file) in files.iter().enumerate() {
            form = form.part(format!("file{i}"), file.to_part()?);
        }
        let resp = self.post_form("/api/chat", form).await?;
        Ok(read_json::<ResultResponse>(resp).await?.result)
    }

    pub async fn generate_title(&self, messages: &[Message]) -> Result<String> {
        let resp = self
            .post_json("/api/generate-title", &TitleRequest::new(messages))
            .await?;
        Ok(read_json::<TitleResponse>(resp).await?.title)
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<reqwest::Response> {
        self.http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))
    }
}

/// Decode a success body, or turn an `{error}` body into an error.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => bail!("{} ({})", body.error, status),
            Err(_) => bail!("server returned {}: {}", status, text),
        }
    }
    resp.json().await.context("failed to decode server response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/api/chat"), "http://localhost:8000/api/chat");
    }

    #[tokio::test]
    async fn attachment_from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.name, "diagram.png");
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.bytes, b"not really a png");
    }

    #[tokio::test]
    async fn attachment_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        std::fs::write(&path, b"x").unwrap();

        let attachment = Attachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn attachment_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Attachment::from_path(&dir.path().join("gone.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn attachment_part_rejects_bad_mime() {
        let attachment = Attachment::new("x", "not a mime", vec![]);
        assert!(attachment.to_part().is_err());
    }
}
