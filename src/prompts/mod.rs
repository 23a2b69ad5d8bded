//! Prompts for the endpoints that call the completion client directly.
//!
//! The translator and email composer keep their templates next to their
//! task implementations; everything else lives here.

use crate::conversation::Message;
use crate::upload::UploadedFile;

const TITLE_INTRO: &str =
    "Based on the following conversation, generate a short, concise title (max 5 words):";
const TITLE_SUFFIX: &str = "Title:";

const CHAT_FILES_HEADER: &str = "User has uploaded the following files:";
const CHAT_SUFFIX: &str = "Assistant: ";
/// Base64 characters of a non-image file included in a chat prompt.
const CHAT_FILE_PREVIEW: usize = 100;

const CODE_INTRO: &str =
    "Based on the following prompt and images, please assist with the coding task:";
const CODE_OUTRO: &str = "Please analyze the images (if any) and provide coding assistance \
                          based on the prompt and image content.";
const CODE_IMAGE_PREVIEW: usize = 20;

const EMAIL_INTRO: &str = "Task: Compose a professional email in American English based on the following input.\n\
     The input may be in any language. Please translate and rephrase as needed to create a \
     polished, formal email suitable for a business context.";
const EMAIL_FORMAT: &str = "Please provide the composed email in the following format:\n\
     Subject: [Translated and/or rephrased subject in American English]\n\n\
     [Body of the email in American English]\n\n\
     [Appropriate closing]";

/// `role: content` lines joined with newlines.
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn chat_prompt(messages: &[Message], files: &[UploadedFile]) -> String {
    let mut prompt = transcript(messages);

    if !files.is_empty() {
        prompt.push_str(&format!("\n\n{CHAT_FILES_HEADER}\n"));
        for (i, file) in files.iter().enumerate() {
            prompt.push_str(&format!(
                "\nFile {}: {} ({})\n",
                i + 1,
                file.name,
                file.mime_type
            ));
            if file.is_image() {
                prompt.push_str(&format!("[Image data: {}]\n", file.data_uri()));
            } else {
                prompt.push_str(&format!(
                    "[File content: {}...]\n",
                    file.preview(CHAT_FILE_PREVIEW)
                ));
            }
        }
    }

    prompt.push_str(&format!("\n\n{CHAT_SUFFIX}"));
    prompt
}

pub fn title_prompt(messages: &[Message]) -> String {
    let mut prompt = format!("{TITLE_INTRO}\n\n");
    for message in messages {
        prompt.push_str(&format!("{}: {}\n", message.role, message.content));
    }
    prompt.push_str(&format!("\n{TITLE_SUFFIX}"));
    prompt
}

pub fn code_assist_prompt(request: &str, images: &[UploadedFile]) -> String {
    let images_desc: String = images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            format!(
                "Image {}: [Base64 encoded image: {}...]\n\n",
                i + 1,
                image.preview(CODE_IMAGE_PREVIEW)
            )
        })
        .collect();

    format!("{CODE_INTRO}\n\nPrompt: {request}\n\n{images_desc}{CODE_OUTRO}")
}

pub fn email_prompt(subject: Option<&str>, content: &str, context: Option<&str>) -> String {
    let mut input = String::new();
    if let Some(subject) = subject {
        input.push_str(&format!("Email subject: {subject}\n"));
    }
    if let Some(context) = context {
        input.push_str(&format!("Context: {context}\n"));
    }
    input.push_str(&format!("Content: {content}"));

    format!("{EMAIL_INTRO}\n\n{input}\n\n{EMAIL_FORMAT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange() -> Vec<Message> {
        vec![
            Message::user("How do I reverse a Vec?"),
            Message::assistant("Call .reverse() on it."),
        ]
    }

    #[test]
    fn transcript_format() {
        assert_eq!(
            transcript(&exchange()),
            "user: How do I reverse a Vec?\nassistant: Call .reverse() on it."
        );
    }

    #[test]
    fn chat_prompt_without_files() {
        let prompt = chat_prompt(&[Message::user("hi")], &[]);
        assert_eq!(prompt, "user: hi\n\nAssistant: ");
    }

    #[test]
    fn chat_prompt_with_no_messages() {
        assert_eq!(chat_prompt(&[], &[]), "\n\nAssistant: ");
    }

    #[test]
    fn chat_prompt_inlines_images_and_truncates_other_files() {
        let image = UploadedFile::from_bytes("shot.png", "image/png", b"png-bytes");
        let doc = UploadedFile::from_bytes("notes.txt", "text/plain", &[b'a'; 200]);

        let prompt = chat_prompt(&[Message::user("look")], &[image.clone(), doc.clone()]);

        assert!(prompt.contains("\n\nUser has uploaded the following files:\n"));
        assert!(prompt.contains("\nFile 1: shot.png (image/png)\n"));
        assert!(prompt.contains(&format!("[Image data: {}]\n", image.data_uri())));
        assert!(prompt.contains("\nFile 2: notes.txt (text/plain)\n"));
        assert!(prompt.contains(&format!("[File content: {}...]\n", &doc.content[..100])));
        assert!(!prompt.contains(&doc.content));
        assert!(prompt.ends_with("\n\nAssistant: "));
    }

    #[test]
    fn title_prompt_format() {
        let prompt = title_prompt(&exchange());
        assert!(prompt.starts_with(TITLE_INTRO));
        assert!(prompt.contains("\n\nuser: How do I reverse a Vec?\n"));
        assert!(prompt.contains("assistant: Call .reverse() on it.\n"));
        assert!(prompt.ends_with("\nTitle:"));
    }

    #[test]
    fn code_prompt_without_images() {
        let prompt = code_assist_prompt("write fizzbuzz", &[]);
        assert!(prompt.contains("Prompt: write fizzbuzz\n\n"));
        assert!(!prompt.contains("Image 1"));
        assert!(prompt.ends_with(CODE_OUTRO));
    }

    #[test]
    fn code_prompt_lists_images() {
        let a = UploadedFile::from_bytes("a.png", "image/png", &[1u8; 64]);
        let b = UploadedFile::from_bytes("b.png", "image/png", &[2u8; 64]);

        let prompt = code_assist_prompt("fix layout", &[a.clone(), b]);
        assert!(prompt.contains(&format!(
            "Image 1: [Base64 encoded image: {}...]\n\n",
            &a.content[..20]
        )));
        assert!(prompt.contains("Image 2: [Base64 encoded image: "));
    }

    #[test]
    fn email_prompt_includes_only_present_fields() {
        let prompt = email_prompt(None, "reunión el lunes", None);
        assert!(prompt.contains("Content: reunión el lunes"));
        assert!(!prompt.contains("Email subject:"));
        assert!(!prompt.contains("Context:"));
        assert!(prompt.ends_with("[Appropriate closing]"));
    }

    #[test]
    fn email_prompt_with_subject_and_context() {
        let prompt = email_prompt(Some("Budget"), "numbers attached", Some("to my manager"));
        assert!(prompt.contains("Email subject: Budget\nContext: to my manager\nContent: numbers attached"));
        assert!(prompt.starts_with("Task: Compose a professional email"));
    }
}
