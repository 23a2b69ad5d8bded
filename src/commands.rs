//! Built-in chat REPL commands prefixed with `/`.

use std::path::PathBuf;

use crate::client::{Attachment, ChatSession};
use crate::consts::format_bytes;

/// A built-in command definition (for parsing and `/help`).
struct Command {
    name: &'static str,
    aliases: &'static [&'static str],
    args: &'static str,
    description: &'static str,
}

const COMMANDS: &[Command] = &[
    Command {
        name: "/help",
        aliases: &["/h", "/?"],
        args: "",
        description: "show this help",
    },
    Command {
        name: "/new",
        aliases: &[],
        args: "",
        description: "start a new chat",
    },
    Command {
        name: "/chats",
        aliases: &["/ls"],
        args: "",
        description: "list chats in this session",
    },
    Command {
        name: "/switch",
        aliases: &["/sw"],
        args: "<n>",
        description: "switch to chat number n",
    },
    Command {
        name: "/attach",
        aliases: &[],
        args: "<path>",
        description: "attach a file to the next message",
    },
    Command {
        name: "/detach",
        aliases: &[],
        args: "",
        description: "drop pending attachments",
    },
    Command {
        name: "/quit",
        aliases: &["quit", "exit", "/exit"],
        args: "",
        description: "exit the REPL",
    },
];

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    New,
    List,
    /// 1-based chat number, as shown by `/chats`.
    Switch(usize),
    Attach(PathBuf),
    Detach,
    Quit,
}

/// Result of looking at one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Plain text, to be sent as a chat message.
    NotACommand,
    Command(ChatCommand),
    /// Looked like a command but could not be used; carries the message.
    Invalid(String),
}

/// What the REPL should do after a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Handled,
    Quit,
}

/// Classify a line of REPL input.
pub fn parse(input: &str) -> Parsed {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };

    let Some(command) = COMMANDS
        .iter()
        .find(|c| c.name == head || c.aliases.contains(&head))
    else {
        if head.starts_with('/') {
            return Parsed::Invalid(format!(
                "unknown command: {head}\ntype /help for available commands"
            ));
        }
        return Parsed::NotACommand;
    };

    // Bare words like "quit" only count when nothing follows them.
    if !head.starts_with('/') && !rest.is_empty() {
        return Parsed::NotACommand;
    }

    let usage = || Parsed::Invalid(format!("usage: {} {}", command.name, command.args));

    let parsed = match command.name {
        "/help" => ChatCommand::Help,
        "/new" => ChatCommand::New,
        "/chats" => ChatCommand::List,
        "/switch" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => ChatCommand::Switch(n),
            _ => return usage(),
        },
        "/attach" => {
            if rest.is_empty() {
                return usage();
            }
            ChatCommand::Attach(PathBuf::from(rest))
        }
        "/detach" => ChatCommand::Detach,
        "/quit" => ChatCommand::Quit,
        _ => return Parsed::NotACommand,
    };
    Parsed::Command(parsed)
}

/// Run a command against the session and the pending attachments.
pub async fn apply(
    command: ChatCommand,
    session: &mut ChatSession,
    pending: &mut Vec<Attachment>,
) -> CommandResult {
    match command {
        ChatCommand::Help => print!("{}", help_text()),
        ChatCommand::New => {
            let n = session.chats().len() + 1;
            session.new_chat();
            println!("  ✓ started chat #{n}");
        }
        ChatCommand::List => print!("{}", list_text(session)),
        ChatCommand::Switch(n) => match session.switch(n - 1) {
            Ok(chat) => println!("  ✓ switched to #{n}: {}", chat.title),
            Err(e) => eprintln!("  ✗ {e}"),
        },
        ChatCommand::Attach(path) => match Attachment::from_path(&path).await {
            Ok(attachment) => {
                println!(
                    "  ✓ attached {} ({}, {})",
                    attachment.name,
                    attachment.mime_type,
                    format_bytes(attachment.bytes.len() as u64)
                );
                pending.push(attachment);
            }
            Err(e) => eprintln!("  ✗ {e:#}"),
        },
        ChatCommand::Detach => {
            let n = pending.len();
            pending.clear();
            println!("  ✓ dropped {n} attachment(s)");
        }
        ChatCommand::Quit => return CommandResult::Quit,
    }
    CommandResult::Handled
}

/// `/help` output, aligned on the longest label.
pub fn help_text() -> String {
    let entries: Vec<(String, &str)> = COMMANDS
        .iter()
        .map(|c| (format_label(c), c.description))
        .collect();

    let max_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(10);

    let mut out = String::new();
    for (label, desc) in &entries {
        out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
    }
    out
}

/// `/chats` output: one numbered line per chat, `*` marks the active one.
pub fn list_text(session: &ChatSession) -> String {
    if session.chats().is_empty() {
        return "  (no chats)\n".to_string();
    }
    let mut out = String::new();
    for (i, chat) in session.chats().iter().enumerate() {
        let marker = if session.current_index() == Some(i) { "*" } else { " " };
        out.push_str(&format!(
            "  {marker} {}. {} ({} messages)\n",
            i + 1,
            chat.title,
            chat.messages.len()
        ));
    }
    out
}

fn format_label(command: &Command) -> String {
    let mut label = command.name.to_string();
    if !command.args.is_empty() {
        label.push(' ');
        label.push_str(command.args);
    }
    if !command.aliases.is_empty() {
        label.push_str(&format!(" ({})", command.aliases.join(", ")));
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse("hello world"), Parsed::NotACommand);
        assert_eq!(parse("what does /usr hold?"), Parsed::NotACommand);
    }

    #[test]
    fn quit_aliases() {
        for input in ["/quit", "quit", "exit", "/exit", "  /quit  "] {
            assert_eq!(parse(input), Parsed::Command(ChatCommand::Quit), "{input}");
        }
    }

    #[test]
    fn bare_word_with_text_is_a_message() {
        assert_eq!(parse("exit the loop early please"), Parsed::NotACommand);
    }

    #[test]
    fn help_aliases() {
        assert_eq!(parse("/h"), Parsed::Command(ChatCommand::Help));
        assert_eq!(parse("/?"), Parsed::Command(ChatCommand::Help));
    }

    #[test]
    fn switch_parses_number() {
        assert_eq!(parse("/switch 2"), Parsed::Command(ChatCommand::Switch(2)));
        assert_eq!(parse("/sw 1"), Parsed::Command(ChatCommand::Switch(1)));
    }

    #[test]
    fn switch_requires_positive_number() {
        assert!(matches!(parse("/switch"), Parsed::Invalid(_)));
        assert!(matches!(parse("/switch 0"), Parsed::Invalid(_)));
        assert!(matches!(parse("/switch two"), Parsed::Invalid(_)));
    }

    #[test]
    fn attach_keeps_path_with_spaces() {
        assert_eq!(
            parse("/attach my notes/todo list.txt"),
            Parsed::Command(ChatCommand::Attach(PathBuf::from("my notes/todo list.txt")))
        );
        assert!(matches!(parse("/attach"), Parsed::Invalid(_)));
    }

    #[test]
    fn unknown_slash_command_is_invalid() {
        match parse("/foobar") {
            Parsed::Invalid(msg) => assert!(msg.contains("/foobar")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn help_text_includes_all_commands() {
        let text = help_text();
        for command in COMMANDS {
            assert!(text.contains(command.name), "help missing: {}", command.name);
        }
        assert!(text.contains("/switch <n> (/sw)"));
    }

    #[test]
    fn no_duplicate_names_or_aliases() {
        let mut seen: Vec<&str> = Vec::new();
        for cmd in COMMANDS {
            for trigger in std::iter::once(&cmd.name).chain(cmd.aliases.iter()) {
                assert!(!seen.contains(trigger), "duplicate trigger: {trigger}");
                seen.push(trigger);
            }
        }
    }

    #[test]
    fn list_marks_current_chat() {
        let mut session = ChatSession::new();
        assert_eq!(list_text(&session), "  (no chats)\n");

        session.new_chat();
        session.new_chat();
        let text = list_text(&session);
        assert!(text.contains("    1. New Chat (0 messages)"));
        assert!(text.contains("  * 2. New Chat (0 messages)"));
    }

    #[tokio::test]
    async fn apply_new_and_switch() {
        let mut session = ChatSession::new();
        let mut pending = Vec::new();

        apply(ChatCommand::New, &mut session, &mut pending).await;
        apply(ChatCommand::New, &mut session, &mut pending).await;
        assert_eq!(session.chats().len(), 2);
        assert_eq!(session.current_index(), Some(1));

        apply(ChatCommand::Switch(1), &mut session, &mut pending).await;
        assert_eq!(session.current_index(), Some(0));

        // Out of range is reported, not fatal.
        let result = apply(ChatCommand::Switch(9), &mut session, &mut pending).await;
        assert_eq!(result, CommandResult::Handled);
        assert_eq!(session.current_index(), Some(0));
    }

    #[tokio::test]
    async fn apply_attach_and_detach() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut session = ChatSession::new();
        let mut pending = Vec::new();

        apply(ChatCommand::Attach(path), &mut session, &mut pending).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].mime_type, "text/plain");

        apply(
            ChatCommand::Attach(dir.path().join("missing.txt")),
            &mut session,
            &mut pending,
        )
        .await;
        assert_eq!(pending.len(), 1);

        apply(ChatCommand::Detach, &mut session, &mut pending).await;
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn apply_quit() {
        let mut session = ChatSession::new();
        let mut pending = Vec::new();
        assert_eq!(
            apply(ChatCommand::Quit, &mut session, &mut pending).await,
            CommandResult::Quit
        );
    }
}
