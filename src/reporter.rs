//! Progress reporting seam.
//!
//! Components never log through a process-wide handle directly. They receive
//! a `&dyn Reporter` instead, so the CLI can forward messages to the `log`
//! facade while tests either drop them or record them for assertions.

use log::Level;

/// Log target used by [`LogReporter`].
pub const LOG_TARGET: &str = "connect_packager";

/// Receives progress and diagnostic messages emitted during a build.
pub trait Reporter {
    /// Handle a single message at `level`.
    fn report(&self, level: Level, message: &str);

    /// Report a per-entry detail message.
    fn debug(&self, message: &str) {
        self.report(Level::Debug, message);
    }

    /// Report a progress message.
    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    /// Report a non-fatal problem.
    fn warn(&self, message: &str) {
        self.report(Level::Warn, message);
    }

    /// Report a failure that ends the build.
    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Forwards messages to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{message}");
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _level: Level, _message: &str) {}
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingReporter;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::{Level, Reporter};
    use std::cell::RefCell;

    /// Test double that keeps every reported message in order.
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        messages: RefCell<Vec<(Level, String)>>,
    }

    impl RecordingReporter {
        /// Return a snapshot of everything reported so far.
        #[must_use]
        pub fn messages(&self) -> Vec<(Level, String)> {
            self.messages.borrow().clone()
        }

        /// Return the messages reported at `level`.
        #[must_use]
        pub fn at_level(&self, level: Level) -> Vec<String> {
            self.messages
                .borrow()
                .iter()
                .filter(|(recorded, _)| *recorded == level)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    impl Reporter for RecordingReporter {
        fn report(&self, level: Level, message: &str) {
            self.messages.borrow_mut().push((level, message.to_owned()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_forward_to_report_with_matching_level() {
        let reporter = RecordingReporter::default();
        reporter.debug("walking");
        reporter.info("building");
        reporter.warn("pool mismatch");
        reporter.error("missing descriptor");

        assert_eq!(
            reporter.messages(),
            vec![
                (Level::Debug, "walking".to_owned()),
                (Level::Info, "building".to_owned()),
                (Level::Warn, "pool mismatch".to_owned()),
                (Level::Error, "missing descriptor".to_owned()),
            ]
        );
        assert_eq!(reporter.at_level(Level::Warn), vec!["pool mismatch"]);
    }

    #[test]
    fn null_reporter_accepts_messages() {
        NullReporter.warn("ignored");
    }
}
