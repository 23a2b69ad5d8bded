//! One handler per endpoint.
//!
//! Translation goes through the task factory; the other endpoints render
//! an inline prompt and call the completion client directly.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
};
use tracing::{debug, warn};

use crate::conversation::Message;
use crate::consts::VERSION;
use crate::prompts;
use crate::tasks::{TARGET_LANGUAGE, Task, TaskOptions};
use crate::upload::UploadedFile;

use super::AppState;
use super::error::{ApiError, ApiResult, JsonBody};
use super::types::{
    EmailRequest, HealthResponse, ResultResponse, TitleRequest, TitleResponse, TranslateRequest,
};

const DEFAULT_MIME: &str = "application/octet-stream";

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

/// POST /api/translate
pub async fn translate(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TranslateRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let input = required(&req.input, "input")?;

    let mut options = TaskOptions::new();
    if let Some(target) = req.target_language {
        options.insert(TARGET_LANGUAGE.to_string(), target);
    }

    let translator = state.factory().create_translator();
    let result = translator
        .execute(input, &options)
        .await
        .map_err(|e| ApiError::upstream("Failed to translate text", e))?;

    Ok(Json(ResultResponse { result }))
}

/// POST /api/email
pub async fn email(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EmailRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let content = required(&req.content, "content")?;
    let prompt = prompts::email_prompt(
        optional(req.subject.as_deref()),
        content,
        optional(req.context.as_deref()),
    );

    let result = state
        .completion
        .complete(&prompt)
        .await
        .map_err(|e| ApiError::upstream("Failed to compose email", e))?;

    Ok(Json(ResultResponse { result }))
}

/// POST /api/code-assist (multipart: `prompt`, `image*`)
pub async fn code_assist(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ResultResponse>> {
    let mut request = None;
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed_form)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "prompt" {
            request = Some(field.text().await.map_err(malformed_form)?);
        } else if name.starts_with("image") {
            // Plain text fields named image* are not uploads.
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let mime = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
            let bytes = field.bytes().await.map_err(malformed_form)?;
            images.push(UploadedFile::from_bytes(file_name, mime, &bytes));
        }
    }

    let request = required(request.as_deref().unwrap_or_default(), "prompt")?;
    debug!(images = images.len(), "code assist request");

    let prompt = prompts::code_assist_prompt(request, &images);
    let result = state
        .completion
        .complete(&prompt)
        .await
        .map_err(|e| ApiError::upstream("Failed to process code assist request", e))?;

    Ok(Json(ResultResponse { result }))
}

/// POST /api/chat (multipart: `messages` as a JSON array string, `file*`)
pub async fn chat(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ResultResponse>> {
    let mut messages_json = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(malformed_form)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "messages" {
            messages_json = Some(field.text().await.map_err(malformed_form)?);
            continue;
        }
        if !name.starts_with("file") {
            continue;
        }
        // Plain text fields named file* are not uploads.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
        match field.bytes().await {
            Ok(bytes) => files.push(UploadedFile::from_bytes(file_name, mime, &bytes)),
            Err(e) => warn!(file = %file_name, error = %e, "failed to read uploaded file, skipping"),
        }
    }

    let messages = match messages_json {
        Some(json) => parse_messages(&json)?,
        None => Vec::new(),
    };
    debug!(messages = messages.len(), files = files.len(), "chat request");

    let prompt = prompts::chat_prompt(&messages, &files);
    let response = state
        .completion
        .complete(&prompt)
        .await
        .map_err(|e| ApiError::upstream("Failed to process chat request", e))?;

    Ok(Json(ResultResponse {
        result: response.trim().to_string(),
    }))
}

/// POST /api/generate-title
pub async fn generate_title(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<TitleRequest>,
) -> ApiResult<Json<TitleResponse>> {
    let invalid = || ApiError::validation("Invalid or empty messages array");

    if !req.messages.as_array().is_some_and(|m| !m.is_empty()) {
        return Err(invalid());
    }
    let messages: Vec<Message> = serde_json::from_value(req.messages).map_err(|_| invalid())?;

    let prompt = prompts::title_prompt(&messages);
    let response = state
        .completion
        .complete(&prompt)
        .await
        .map_err(|e| ApiError::upstream("Failed to generate title", e))?;

    Ok(Json(TitleResponse {
        title: response.trim().to_string(),
    }))
}

/// Decode the chat form's `messages` field: a JSON array of messages.
fn parse_messages(json: &str) -> ApiResult<Vec<Message>> {
    let invalid = || ApiError::validation("Invalid messages format");

    let value: serde_json::Value = serde_json::from_str(json).map_err(|_| invalid())?;
    if !value.is_array() {
        return Err(invalid());
    }
    serde_json::from_value(value).map_err(|_| invalid())
}

fn required<'a>(value: &'a str, field: &str) -> ApiResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn malformed_form(err: MultipartError) -> ApiError {
    ApiError::validation(format!("Invalid form data: {}", err.body_text()))
}
