// src/services/observer.rs

//! Observability hooks for feed operations.
//!
//! Feed operations report to a [`FeedObserver`] handed to them explicitly
//! rather than to a process-wide tracer. [`NoopObserver`] is the default.

use std::fmt;
use std::time::{Duration, Instant};

/// Receives span-style events from feed operations.
pub trait FeedObserver: Send + Sync {
    /// An operation started.
    fn enter(&self, _operation: &'static str) {}

    /// An operation recorded a key/value fact about itself.
    fn tag(&self, _operation: &'static str, _key: &'static str, _value: &dyn fmt::Display) {}

    /// An operation finished, successfully or not.
    fn exit(&self, _operation: &'static str, _elapsed: Duration) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FeedObserver for NoopObserver {}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl FeedObserver for LogObserver {
    fn enter(&self, operation: &'static str) {
        log::debug!("[{operation}] enter");
    }

    fn tag(&self, operation: &'static str, key: &'static str, value: &dyn fmt::Display) {
        log::debug!("[{operation}] {key}={value}");
    }

    fn exit(&self, operation: &'static str, elapsed: Duration) {
        log::debug!("[{operation}] exit after {}ms", elapsed.as_millis());
    }
}

/// Scope of one observed operation. Reports `exit` when dropped.
pub struct Span<'a> {
    observer: &'a dyn FeedObserver,
    operation: &'static str,
    started: Instant,
}

impl<'a> Span<'a> {
    pub fn enter(observer: &'a dyn FeedObserver, operation: &'static str) -> Self {
        observer.enter(operation);
        Self {
            observer,
            operation,
            started: Instant::now(),
        }
    }

    pub fn tag(&self, key: &'static str, value: &dyn fmt::Display) {
        self.observer.tag(self.operation, key, value);
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        self.observer.exit(self.operation, self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl FeedObserver for Recorder {
        fn enter(&self, operation: &'static str) {
            self.0.lock().unwrap().push(format!("enter {operation}"));
        }

        fn tag(&self, operation: &'static str, key: &'static str, value: &dyn fmt::Display) {
            self.0.lock().unwrap().push(format!("{operation} {key}={value}"));
        }

        fn exit(&self, operation: &'static str, _elapsed: Duration) {
            self.0.lock().unwrap().push(format!("exit {operation}"));
        }
    }

    #[test]
    fn span_reports_enter_tags_and_exit_in_order() {
        let recorder = Recorder::default();
        {
            let span = Span::enter(&recorder, "biggest");
            span.tag("magnitude", &5.8);
        }
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["enter biggest", "biggest magnitude=5.8", "exit biggest"]
        );
    }
}
