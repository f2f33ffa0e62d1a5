use std::sync::Mutex;

use tracing::info;

/// Receives human-readable stage messages during a shading run.
pub trait ProgressSink: Sync {
    fn message(&self, message: &str);
}

/// Forwards messages to the `tracing` subscriber at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn message(&self, message: &str) {
        info!(target: "shade_raster::progress", "{message}");
    }
}

/// Keeps every message for the host to display later.
#[derive(Debug, Default)]
pub struct CollectProgress {
    messages: Mutex<Vec<String>>,
}

impl CollectProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ProgressSink for CollectProgress {
    fn message(&self, message: &str) {
        let mut messages = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        messages.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_keeps_order() {
        let sink = CollectProgress::new();
        sink.message("first");
        sink.message("second");
        assert_eq!(sink.messages(), vec!["first".to_string(), "second".to_string()]);
    }
}
