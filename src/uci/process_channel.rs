//! [`EngineChannel`] over a child process' stdin/stdout.
//!
//! A reader thread drains stdout into an mpsc queue so reads can time out
//! without blocking on the pipe.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::errors::{EngineError, EngineResult};
use crate::uci::engine_channel::EngineChannel;

pub struct ProcessChannel {
    path: PathBuf,
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
}

impl ProcessChannel {
    pub fn spawn(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut child = Command::new(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {e}", path.display())))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            abort_child(&mut child);
            return Err(EngineError::Spawn(format!(
                "{}: stdio pipes unavailable",
                path.display()
            )));
        };

        let (tx, rx) = channel::<String>();
        let reader = BufReader::new(stdout);
        let spawned = thread::Builder::new()
            .name("engine-stdout".to_owned())
            .spawn(move || {
                for line in reader.lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = spawned {
            abort_child(&mut child);
            return Err(EngineError::Io(e));
        }

        debug!(path = %path.display(), pid = child.id(), "external engine started");
        Ok(Self {
            path,
            child,
            stdin,
            lines: rx,
        })
    }
}

/// Kill and reap a child that never became a usable channel.
fn abort_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        trace!(error = %e, "engine kill skipped");
    }
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "failed to reap engine process");
    }
}

impl EngineChannel for ProcessChannel {
    fn send(&mut self, line: &str) -> EngineResult<()> {
        trace!(line, ">> engine");
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn recv_timeout(&mut self, timeout: Duration) -> EngineResult<Option<String>> {
        match self.lines.recv_timeout(timeout) {
            Ok(line) => {
                let line = line.trim().to_owned();
                trace!(line = %line, "<< engine");
                Ok(Some(line))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::ChannelClosed),
        }
    }
}

impl Drop for ProcessChannel {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.stdin.flush();
        if let Err(e) = self.child.kill() {
            // Already exited after `quit`.
            trace!(error = %e, "engine kill skipped");
        }
        if let Err(e) = self.child.wait() {
            warn!(path = %self.path.display(), error = %e, "failed to reap engine process");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let result = ProcessChannel::spawn("/nonexistent/boardside-test-engine");
        assert!(matches!(result, Err(EngineError::Spawn(_))));
    }

    #[cfg(unix)]
    #[test]
    fn aborted_child_is_killed_and_reaped() {
        let Ok(mut child) = Command::new("sleep").arg("30").spawn() else {
            return;
        };
        abort_child(&mut child);
        let status = child.try_wait().expect("child already reaped");
        assert!(status.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn echoes_through_cat() {
        let Ok(mut chan) = ProcessChannel::spawn("cat") else {
            return;
        };
        chan.send("isready").expect("send");
        let line = chan
            .recv_timeout(Duration::from_secs(5))
            .expect("cat stays open");
        assert_eq!(line.as_deref(), Some("isready"));
    }
}
