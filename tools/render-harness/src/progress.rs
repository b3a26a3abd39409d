//! Render progress reporting through `log`.

use std::time::{Duration, Instant};

/// Tracks one render run: frame counter, percent done and time remaining.
#[derive(Debug)]
pub struct Progress {
    label: String,
    total: usize,
    start: Instant,
}

impl Progress {
    pub fn start(label: impl Into<String>, total: usize) -> Self {
        let label = label.into();
        log::info!("{}: rendering {} frame(s)", label, total);
        Self {
            label,
            total,
            start: Instant::now(),
        }
    }

    pub fn update(&self, frame: usize, percent: f64) {
        match estimate_remaining(self.start.elapsed(), percent) {
            Some(left) => log::info!(
                "{}: frame {} of {} ({:.1}%), estimated {} left",
                self.label,
                frame,
                self.total,
                percent * 100.0,
                format_mmss(left)
            ),
            None => log::info!(
                "{}: frame {} of {} ({:.1}%)",
                self.label,
                frame,
                self.total,
                percent * 100.0
            ),
        }
    }

    /// Log the summary and return the elapsed time.
    pub fn complete(&self) -> Duration {
        let elapsed = self.start.elapsed();
        log::info!(
            "{}: render complete, elapsed {}",
            self.label,
            format_mmss(elapsed)
        );
        elapsed
    }
}

/// Linear extrapolation of the remaining time. `None` before any progress.
pub fn estimate_remaining(elapsed: Duration, percent: f64) -> Option<Duration> {
    if percent <= 0.0 || !percent.is_finite() {
        return None;
    }
    let left = elapsed.as_secs_f64() / percent * (1.0 - percent);
    Some(Duration::from_secs_f64(left.max(0.0)))
}

/// `m:ss`, truncated to whole seconds.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "0:00");
        assert_eq!(format_mmss(Duration::from_secs(59)), "0:59");
        assert_eq!(format_mmss(Duration::from_millis(125_900)), "2:05");
    }

    #[test]
    fn test_estimate_remaining() {
        assert_eq!(estimate_remaining(Duration::from_secs(10), 0.0), None);
        assert_eq!(
            estimate_remaining(Duration::from_secs(10), 0.25),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            estimate_remaining(Duration::from_secs(10), 1.0),
            Some(Duration::ZERO)
        );
    }
}
