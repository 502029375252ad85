use std::time::{Duration, Instant};

/// Default minimum time between two batch-triggered paints.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(300);

/// Rate limiter for repaints.
///
/// Refreshes requested by row batches paint at most once per interval; a skipped refresh is
/// remembered so that [`RenderThrottle::flush_due`] can paint it once the interval has passed.
/// Forced refreshes (user actions, file completion) always paint.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    interval: Duration,
    last_paint: Option<Instant>,
    pending: bool,
}

impl Default for RenderThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

impl RenderThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_paint: None,
            pending: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a refresh requested at `now` should paint, and record it if so.
    pub fn request(&mut self, now: Instant, force: bool) -> bool {
        if force || self.elapsed(now) {
            self.last_paint = Some(now);
            self.pending = false;
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// A refresh was skipped and the interval has now passed.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        self.pending && self.request(now, false)
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    fn elapsed(&self, now: Instant) -> bool {
        self.last_paint
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::RenderThrottle;

    #[test]
    fn batches_paint_at_most_once_per_interval() {
        let t0 = Instant::now();
        let mut t = RenderThrottle::new(Duration::from_millis(300));
        assert!(t.request(t0, false));
        assert!(!t.request(t0 + Duration::from_millis(100), false));
        assert!(!t.request(t0 + Duration::from_millis(299), false));
        assert!(t.request(t0 + Duration::from_millis(300), false));
    }

    #[test]
    fn forced_refresh_always_paints() {
        let t0 = Instant::now();
        let mut t = RenderThrottle::new(Duration::from_millis(300));
        assert!(t.request(t0, false));
        assert!(t.request(t0 + Duration::from_millis(1), true));
        assert!(!t.request(t0 + Duration::from_millis(2), false));
    }

    #[test]
    fn skipped_refresh_is_flushed_later() {
        let t0 = Instant::now();
        let mut t = RenderThrottle::new(Duration::from_millis(300));
        assert!(t.request(t0, false));
        assert!(!t.flush_due(t0 + Duration::from_millis(10)));
        assert!(!t.request(t0 + Duration::from_millis(10), false));
        assert!(t.has_pending());
        assert!(!t.flush_due(t0 + Duration::from_millis(20)));
        assert!(t.flush_due(t0 + Duration::from_millis(310)));
        assert!(!t.has_pending());
    }
}
