use std::collections::VecDeque;

/// Default number of status messages kept
pub const DEFAULT_LOG_CAPACITY: usize = 10;

/// Capped list of user-facing status messages, oldest first.
///
/// Every message is also forwarded to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogSink {
    messages: VecDeque<String>,
    capacity: usize,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.record(message);
    }

    /// Record a recoverable problem
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.record(message);
    }

    fn record(&mut self, message: String) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.messages.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_messages_drop_first() {
        let mut sink = LogSink::new(3);
        for n in 0..5 {
            sink.push(format!("message {n}"));
        }
        assert_eq!(
            sink.messages().collect::<Vec<_>>(),
            vec!["message 2", "message 3", "message 4"]
        );
        assert_eq!(sink.latest(), Some("message 4"));
    }

    #[test]
    fn test_warn_is_recorded() {
        let mut sink = LogSink::default();
        sink.warn("Nothing to undo");
        assert_eq!(sink.len(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }
}
