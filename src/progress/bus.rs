//! In-process event bus for progress events.

use std::sync::mpsc::{channel, Receiver, SendError, Sender};

use crate::progress::event::{DigestEvent, ProgressEnvelope};

/// Consumer-agnostic destination for progress events.
///
/// Emitting is observational only; a sink must never influence digest results.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: DigestEvent);
}

/// Sender half of the progress channel. Clone freely; the channel closes when the
/// last clone is dropped.
#[derive(Clone)]
pub struct ProgressBus {
    sender: Sender<ProgressEnvelope>,
}

impl ProgressBus {
    pub fn new_pair() -> (Self, Receiver<ProgressEnvelope>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, event: DigestEvent) -> Result<(), SendError<ProgressEnvelope>> {
        self.sender.send(ProgressEnvelope::with_now(event))
    }
}

impl ProgressSink for ProgressBus {
    fn emit(&self, event: DigestEvent) {
        if self.send(event).is_err() {
            tracing::trace!("Progress receiver dropped, event discarded");
        }
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: DigestEvent) {}
}
