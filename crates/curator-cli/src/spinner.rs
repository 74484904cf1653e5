//! Background progress indicator for long-running server tasks.
//!
//! The spinner runs on its own tokio task and carries no data; the only
//! shared state is a set-once stop flag. `stop` sends the flag and awaits
//! the task, so the terminal line is always cleared before control
//! returns to the caller.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

const FRAMES: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];
const TICK: Duration = Duration::from_millis(100);

/// A spinner ticking on a background task until stopped.
pub(crate) struct Spinner {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Spinner {
    /// Spawn the indicator task. Frames are drawn to stderr only when it
    /// is a terminal; the task still runs otherwise so the stop/join
    /// contract is identical in both cases.
    pub(crate) fn start(message: &str) -> Self {
        let (stop, mut stopped) = watch::channel(false);
        let message = message.to_string();
        let task = tokio::spawn(async move {
            let draw = io::stderr().is_terminal();
            let mut ticker = tokio::time::interval(TICK);
            let mut frame = 0usize;
            loop {
                tokio::select! {
                    _ = stopped.changed() => break,
                    _ = ticker.tick() => {
                        if draw {
                            eprint!("\r{} {message}", FRAMES[frame % FRAMES.len()]);
                            let _ = io::stderr().flush();
                            frame += 1;
                        }
                    }
                }
            }
            if draw {
                let width = message.chars().count() + 2;
                eprint!("\r{}\r", " ".repeat(width));
                let _ = io::stderr().flush();
            }
        });
        Self { stop, task }
    }

    /// Signal the indicator to stop and wait for its task to finish.
    pub(crate) async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
