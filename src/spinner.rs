//! A minimal terminal spinner shown while a request is in flight.

use std::future::Future;
use std::io::{IsTerminal, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const INTERVAL: Duration = Duration::from_millis(80);

/// A spinner drawn on stderr by a background task.
///
/// When stderr is not a terminal nothing is drawn, so piped output
/// stays clean.
pub struct Spinner {
    running: Option<(JoinHandle<()>, watch::Sender<bool>)>,
}

impl Spinner {
    /// Start a spinner with the given message (e.g. `"translating"`).
    pub fn start(message: &str) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self { running: None };
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let mut i = 0;
            loop {
                let frame = FRAMES[i % FRAMES.len()];
                // \x1b[2K clears the line, \r returns to column 0
                eprint!("\x1b[2K\r{frame} {message}");
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                i += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            running: Some((handle, cancel_tx)),
        }
    }

    /// Stop the spinner and clear its line.
    pub async fn stop(self) {
        if let Some((handle, cancel)) = self.running {
            let _ = cancel.send(true);
            let _ = handle.await;
        }
    }
}

/// Run `fut` with a spinner showing `message`, clearing it afterwards.
pub async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let spinner = Spinner::start(message);
    let output = fut.await;
    spinner.stop().await;
    output
}
