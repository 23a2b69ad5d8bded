//! Startup banner and chat session summary display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO, VERSION};

/// Model label when this process never calls the model itself.
pub const NO_MODEL: &str = "n/a";

/// What to show under the banner.
pub struct BannerInfo<'a> {
    /// `serve` or `chat`.
    pub mode: &'a str,
    /// Model name, or [`NO_MODEL`].
    pub model: &'a str,
    /// Listen address for `serve`, server URL for `chat`.
    pub endpoint: &'a str,
    pub auth_status: &'a str,
}

/// Render the startup banner.
pub fn banner_text(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║              S C R I B E              ║
   ║      words in, better words out       ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   mode      {}
   model     {}
   endpoint  {}
   auth      {}
"#,
        VERSION,
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.mode,
        info.model,
        info.endpoint,
        info.auth_status,
    )
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}

/// Render the chat summary line (omitted when nothing was said).
pub fn session_summary(chats: usize, messages: usize) -> Option<String> {
    if messages == 0 {
        return None;
    }
    Some(format!("session: {chats} chat(s), {messages} message(s)"))
}

/// Print the session summary and farewell.
pub fn print_session_summary(chats: usize, messages: usize) {
    if let Some(line) = session_summary(chats, messages) {
        println!("{line}");
    }
    println!("goodbye.");
}

/// Auth label for the banner from an optional API key.
pub fn auth_status(api_key: Option<&str>) -> &'static str {
    match api_key {
        Some(key) if !key.trim().is_empty() => "API key ✓",
        _ => "not authenticated",
    }
}
