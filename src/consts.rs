//! Project-wide constants.

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Anthropic model when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Default cap on completion output tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Anthropic Messages API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Environment variable holding the Anthropic API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Where the terminal client looks for the server by default.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Language the translator targets when none is given.
pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

/// Title every conversation starts with until the first exchange.
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Assistant reply shown when a chat request fails.
pub const CHAT_ERROR_REPLY: &str = "An error occurred. Please try again.";

/// Format a byte count for display (e.g. `1.5 MB`).
pub fn format_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", n, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!AUTHOR.is_empty());
        assert!(!HOMEPAGE.is_empty());
        assert!(!REPO.is_empty());
        assert!(!DEFAULT_MODEL.is_empty());
        assert!(!DEFAULT_API_URL.is_empty());
    }

    #[test]
    fn consts_from_cargo_toml() {
        assert!(AUTHOR.contains("Assaf Sapir"));
        assert!(REPO.contains("github.com/assapir/scribe"));
    }

    #[test]
    fn default_server_url_matches_bind_and_port() {
        assert_eq!(
            DEFAULT_SERVER_URL,
            format!("http://{DEFAULT_BIND}:{DEFAULT_PORT}")
        );
    }

    #[test]
    fn format_bytes_small() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(999), "999 B");
    }

    #[test]
    fn format_bytes_scaled() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(10 * 1024 * 1024), "10.0 MB");
    }
}
