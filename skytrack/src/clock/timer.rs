//! Wall-clock stopwatch driven by explicit instants.

use std::time::Instant;

/// Measures real elapsed time since the last start.
///
/// All readings take the current instant as an argument so callers (and
/// tests) control time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElapsedTimer {
    started_at: Option<Instant>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start, or restart from zero.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Milliseconds since start, or 0 when stopped.
    pub fn elapsed_ms(&self, now: Instant) -> i64 {
        self.started_at.map_or(0, |started| {
            i64::try_from(now.saturating_duration_since(started).as_millis()).unwrap_or(i64::MAX)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_while_running() {
        let base = Instant::now();
        let mut timer = ElapsedTimer::new();
        assert_eq!(timer.elapsed_ms(base), 0);

        timer.start(base);
        assert!(timer.is_running());
        assert_eq!(timer.elapsed_ms(base + Duration::from_millis(1_500)), 1_500);

        timer.stop();
        assert_eq!(timer.elapsed_ms(base + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_elapsed_never_negative() {
        let base = Instant::now();
        let mut timer = ElapsedTimer::new();
        timer.start(base + Duration::from_secs(1));
        assert_eq!(timer.elapsed_ms(base), 0);
    }
}
