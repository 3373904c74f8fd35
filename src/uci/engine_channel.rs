//! Line-oriented transport to an external engine.
//!
//! The adapter only ever talks through [`EngineChannel`], so a child process,
//! an in-memory script or any other transport can sit behind it.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use crate::errors::{EngineError, EngineResult};

pub trait EngineChannel: Send {
    /// Send one command line (without trailing newline).
    fn send(&mut self, line: &str) -> EngineResult<()>;

    /// Next line from the engine, waiting at most `timeout`.
    ///
    /// `Ok(None)` means nothing arrived in time; a closed transport is an
    /// error.
    fn recv_timeout(&mut self, timeout: Duration) -> EngineResult<Option<String>>;
}

type Responder = Box<dyn FnMut(&str) -> Vec<String> + Send>;

/// In-memory channel that answers each command through a responder
/// closure. Every sent line is also forwarded to the returned receiver.
pub struct ScriptedChannel {
    responder: Responder,
    pending: VecDeque<String>,
    sent: Sender<String>,
    closed: bool,
}

impl ScriptedChannel {
    pub fn new<F>(responder: F) -> (Self, Receiver<String>)
    where
        F: FnMut(&str) -> Vec<String> + Send + 'static,
    {
        let (sent, sent_rx) = channel();
        let channel = Self {
            responder: Box::new(responder),
            pending: VecDeque::new(),
            sent,
            closed: false,
        };
        (channel, sent_rx)
    }

    /// Simulate the engine going away: further sends and reads fail.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl EngineChannel for ScriptedChannel {
    fn send(&mut self, line: &str) -> EngineResult<()> {
        if self.closed {
            return Err(EngineError::ChannelClosed);
        }
        // The receiver may already be gone; the log is optional.
        let _ = self.sent.send(line.to_owned());
        let replies = (self.responder)(line);
        self.pending.extend(replies);
        Ok(())
    }

    fn recv_timeout(&mut self, _timeout: Duration) -> EngineResult<Option<String>> {
        match self.pending.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.closed => Err(EngineError::ChannelClosed),
            None => Ok(None),
        }
    }
}
