use std::time::{Duration, Instant};

const SECOND: Duration = Duration::from_secs(1);

/// Emitted once when a question's countdown reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeout {
    pub question_index: usize,
}

/// Per-question countdown. One instance is built for each question and
/// dropped (or cancelled) when the question changes, so a tick can never
/// land on a later question.
#[derive(Clone, Debug)]
pub struct Countdown {
    question_index: usize,
    duration: u32,
    time_left: u32,
    next_tick_at: Instant,
    fired: bool,
    cancelled: bool,
}

impl Countdown {
    pub fn new(question_index: usize, duration: u32, now: Instant) -> Self {
        let duration = duration.max(1);
        Self {
            question_index,
            duration,
            time_left: duration,
            next_tick_at: now + SECOND,
            fired: false,
            cancelled: false,
        }
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Fraction of the countdown remaining, from 1.0 down to 0.0.
    pub fn ratio(&self) -> f64 {
        self.time_left as f64 / self.duration as f64
    }

    pub fn is_warning(&self, threshold: u32) -> bool {
        self.time_left <= threshold
    }

    pub fn is_running(&self) -> bool {
        !self.fired && !self.cancelled
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Apply one elapsed second.
    pub fn tick(&mut self) -> Option<Timeout> {
        if !self.is_running() {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.next_tick_at += SECOND;
        self.check_expired()
    }

    /// Apply every whole second that has elapsed up to `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Timeout> {
        while self.is_running() && self.time_left > 0 && now >= self.next_tick_at {
            self.time_left -= 1;
            self.next_tick_at += SECOND;
        }
        self.check_expired()
    }

    fn check_expired(&mut self) -> Option<Timeout> {
        if self.time_left == 0 && self.is_running() {
            self.fired = true;
            Some(Timeout {
                question_index: self.question_index,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_full() {
        let t = Countdown::new(0, 30, Instant::now());
        assert_eq!(t.time_left(), 30);
        assert_eq!(t.ratio(), 1.0);
        assert!(t.is_running());
    }

    #[test]
    fn test_tick_decrements_by_one() {
        let mut t = Countdown::new(0, 3, Instant::now());
        assert_eq!(t.tick(), None);
        assert_eq!(t.time_left(), 2);
        assert_eq!(t.tick(), None);
        assert_eq!(t.time_left(), 1);
    }

    #[test]
    fn test_fires_exactly_once() {
        let mut t = Countdown::new(4, 2, Instant::now());
        assert_eq!(t.tick(), None);
        assert_eq!(t.tick(), Some(Timeout { question_index: 4 }));
        assert_eq!(t.tick(), None);
        assert_eq!(t.time_left(), 0);
        assert!(!t.is_running());
    }

    #[test]
    fn test_poll_waits_for_whole_seconds() {
        let t0 = Instant::now();
        let mut t = Countdown::new(0, 10, t0);
        assert_eq!(t.poll(t0 + Duration::from_millis(900)), None);
        assert_eq!(t.time_left(), 10);
        t.poll(t0 + Duration::from_millis(1000));
        assert_eq!(t.time_left(), 9);
    }

    #[test]
    fn test_poll_catches_up_missed_seconds() {
        let t0 = Instant::now();
        let mut t = Countdown::new(0, 10, t0);
        t.poll(t0 + Duration::from_millis(3500));
        assert_eq!(t.time_left(), 7);
    }

    #[test]
    fn test_poll_past_deadline_fires_once_and_stops_at_zero() {
        let t0 = Instant::now();
        let mut t = Countdown::new(1, 5, t0);
        assert_eq!(
            t.poll(t0 + Duration::from_secs(60)),
            Some(Timeout { question_index: 1 })
        );
        assert_eq!(t.time_left(), 0);
        assert_eq!(t.poll(t0 + Duration::from_secs(120)), None);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut t = Countdown::new(0, 1, t0);
        t.cancel();
        assert_eq!(t.poll(t0 + Duration::from_secs(5)), None);
        assert_eq!(t.tick(), None);
        assert_eq!(t.time_left(), 1);
    }

    #[test]
    fn test_ratio_is_monotonic() {
        let mut t = Countdown::new(0, 4, Instant::now());
        let mut last = t.ratio();
        for _ in 0..4 {
            t.tick();
            assert!(t.ratio() <= last);
            last = t.ratio();
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn test_zero_duration_clamped_to_one_second() {
        let mut t = Countdown::new(0, 0, Instant::now());
        assert_eq!(t.duration(), 1);
        assert!(t.tick().is_some());
    }

    #[test]
    fn test_warning_threshold() {
        let mut t = Countdown::new(0, 7, Instant::now());
        assert!(!t.is_warning(5));
        t.tick();
        t.tick();
        assert!(t.is_warning(5));
    }
}
