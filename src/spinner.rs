//! Progress indicator shown on stderr while a model call is in flight.
//!
//! Model replies take seconds, so the line also shows the elapsed time.

use std::future::Future;
use std::io::Write;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(80);

/// `"forecasting"` after 3.2s -> `"⠋ forecasting (3s)"`.
fn status_line(frame: usize, label: &str, elapsed: Duration) -> String {
    let glyph = FRAMES[frame % FRAMES.len()];
    match elapsed.as_secs() {
        0 => format!("{glyph} {label}"),
        secs => format!("{glyph} {label} ({secs}s)"),
    }
}

/// A spinner ticking on a background task until [`Spinner::stop`].
pub struct Spinner {
    task: JoinHandle<()>,
    done: watch::Sender<bool>,
}

impl Spinner {
    pub fn start(label: &str) -> Self {
        let (done, mut done_rx) = watch::channel(false);
        let label = label.to_string();
        let started = Instant::now();

        let task = tokio::spawn(async move {
            let mut tick = 0;
            loop {
                // \x1b[2K clears the line, \r returns to its start
                eprint!("\x1b[2K\r{}", status_line(tick, &label, started.elapsed()));
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(TICK) => tick += 1,
                    _ = done_rx.changed() => break,
                }
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self { task, done }
    }

    /// Stop ticking and wait until the line is cleared.
    pub async fn stop(self) {
        let _ = self.done.send(true);
        let _ = self.task.await;
    }

    /// Show a spinner while `work` runs. The line is cleared before the
    /// result is returned, so callers can print straight away.
    pub async fn during<F: Future>(label: &str, work: F) -> F::Output {
        let spinner = Self::start(label);
        let output = work.await;
        spinner.stop().await;
        output
    }
}
