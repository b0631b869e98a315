//! Notification sinks for run progress.
//!
//! The engine reports each node it enters and when highlights should be
//! cleared. Observers are fire-and-forget: the engine never inspects what
//! they do, so a slow or disconnected consumer cannot affect a run.

use std::sync::mpsc;

/// Events mirrored by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    NodeEntered(String),
    HighlightsCleared,
}

/// Receives progress notifications from a running macro.
pub trait RunObserver: Send + Sync {
    fn on_node_entered(&self, node_id: &str);

    fn on_highlights_cleared(&self);
}

/// An observer that discards all notifications.
#[derive(Debug, Clone, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn on_node_entered(&self, _node_id: &str) {}

    fn on_highlights_cleared(&self) {}
}

/// An observer that forwards notifications to a channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::Sender<RunEvent>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::Sender<RunEvent>) -> Self {
        Self { sender }
    }

    /// Creates an observer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::Receiver<RunEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl RunObserver for ChannelObserver {
    fn on_node_entered(&self, node_id: &str) {
        // Receiver may have been dropped
        let _ = self.sender.send(RunEvent::NodeEntered(node_id.to_string()));
    }

    fn on_highlights_cleared(&self) {
        let _ = self.sender.send(RunEvent::HighlightsCleared);
    }
}
