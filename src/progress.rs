use std::{sync::LazyLock, time::Duration};

use log::info;
use regex::Regex;

use crate::constants::{ELAPSED_MARKER, RETRAIN_COMPONENT};

static ELAPSED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+):(\d{2}):(\d{2})\.(\d{7})").expect("valid elapsed token pattern")
});

/// Estimates the remaining training time from the retrainer epoch log lines.
///
/// Only lines of the retraining component that carry an elapsed time
/// formatted as `hh:mm:ss.fffffff` are taken into account.
pub struct ProgressReporter {
    epochs: usize,
    finished: usize,
    elapsed: Duration,
}

impl ProgressReporter {
    pub fn new(epochs: usize) -> Self {
        ProgressReporter {
            epochs,
            finished: 0,
            elapsed: Duration::ZERO,
        }
    }
    pub fn finished(&self) -> usize {
        self.finished
    }
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
    /// Consumes a log line, returning the remaining time estimate when the
    /// line completes one of the expected epochs.
    pub fn observe(&mut self, message: &str) -> Option<Duration> {
        if !message.contains(RETRAIN_COMPONENT) || !message.contains(ELAPSED_MARKER) {
            return None;
        }
        let epoch_elapsed = parse_elapsed(message)?;
        self.finished += 1;
        if self.finished > self.epochs {
            return None;
        }
        self.elapsed += epoch_elapsed;
        let elapsed_secs = self.elapsed.as_secs_f64();
        let remaining_secs =
            (elapsed_secs / self.finished as f64) * self.epochs as f64 - elapsed_secs;
        let remaining = Duration::from_secs_f64(remaining_secs.max(0.));
        info!(
            "remaining: {}, epoch: {} / {}",
            format_remaining(remaining),
            self.finished,
            self.epochs
        );
        Some(remaining)
    }
}

/// Last `hh:mm:ss.fffffff` token of a message.
fn parse_elapsed(message: &str) -> Option<Duration> {
    let captures = ELAPSED_TOKEN.captures_iter(message).last()?;
    let field = |i: usize| captures.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    let secs = field(1)? * 3600 + field(2)? * 60 + field(3)?;
    let ticks = field(4)?;
    Some(Duration::from_secs(secs) + Duration::from_nanos(ticks * 100))
}

/// Formats a duration as `hh:mm:ss.fffffff`.
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:07}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        duration.subsec_nanos() / 100
    )
}

fn format_remaining(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
