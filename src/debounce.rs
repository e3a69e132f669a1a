use std::time::{Duration, Instant};

/// Holds back a rapidly-changing value until it has stopped changing for a
/// configured delay.
///
/// Purely passive: the event loop records changes with `input` and asks for
/// the settled value with `poll`. There is no thread and no sleeping, only
/// a deadline checked against the caller's clock, so the pending emission
/// can always be cancelled before it is observed.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new input. Any previously scheduled emission is discarded
    /// and the timer restarts from `now`, so only the last value of a burst
    /// ever comes out of `poll`.
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Emit the pending value if its delay has elapsed. Each settled value
    /// is emitted exactly once.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Drop the pending emission without observing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending emission becomes due. Lets the event loop size its
    /// poll timeout instead of busy-waiting.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|&(_, deadline)| deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn burst_emits_only_last_value_exactly_once() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.input("a", at(t0, 0));
        debounce.input("ab", at(t0, 100));
        debounce.input("abc", at(t0, 200));

        // 500ms after the last input, not the first
        assert_eq!(debounce.poll(at(t0, 699)), None);
        assert_eq!(debounce.poll(at(t0, 700)), Some("abc"));
        assert_eq!(debounce.poll(at(t0, 10_000)), None);
    }

    #[test]
    fn each_change_resets_the_timer() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.input("a", at(t0, 0));
        assert_eq!(debounce.poll(at(t0, 400)), None);
        debounce.input("b", at(t0, 450));
        assert_eq!(debounce.poll(at(t0, 500)), None);
        assert_eq!(debounce.poll(at(t0, 950)), Some("b"));
    }

    #[test]
    fn zero_delay_is_passthrough_on_next_poll() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(Duration::ZERO);
        debounce.input("a", t0);
        assert_eq!(debounce.poll(t0), Some("a"));
    }

    #[test]
    fn cancel_discards_pending_emission() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.input("a", t0);
        debounce.cancel();
        assert_eq!(debounce.poll(at(t0, 10_000)), None);
    }

    #[test]
    fn deadline_tracks_last_input() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        assert!(debounce.deadline().is_none());
        debounce.input("a", at(t0, 100));
        assert_eq!(debounce.deadline(), Some(at(t0, 600)));
    }
}
