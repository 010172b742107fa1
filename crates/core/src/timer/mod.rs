//! Millisecond tick timer
//!
//! Ticks are wall-clock milliseconds elapsed since an origin captured on
//! [`Ticks::init`] (or lazily on the first [`Ticks::get_ticks`]). The value
//! is a 32-bit counter that wraps after about 49.7 days, so two tick values
//! must be compared with [`ticks_passed`] rather than `<`/`>`.
//!
//! There is no high-resolution counter on this backend:
//! [`Ticks::performance_counter`] is the millisecond tick count and
//! [`Ticks::performance_frequency`] is a fixed 1000 Hz.

use std::sync::Arc;

use psl1ght_native::NativeClock;
use psl1ght_sdk::consts::PERFORMANCE_FREQUENCY;
use psl1ght_sdk::TimeVal;

/// Returns `true` once tick value `now` has reached or passed `deadline`
///
/// Correct across the 32-bit wraparound as long as the two values are less
/// than about 24.8 days apart.
pub fn ticks_passed(now: u32, deadline: u32) -> bool {
    (deadline.wrapping_sub(now) as i32) <= 0
}

/// Sleep the calling thread on `clock` for at least `ms` milliseconds
pub fn delay(clock: &dyn NativeClock, ms: u32) {
    clock.usleep(u64::from(ms) * 1000);
}

/// Process tick origin and clock
///
/// `Uninitialized -> Running -> Uninitialized`, re-initializable.
pub struct Ticks {
    clock: Arc<dyn NativeClock>,
    start: TimeVal,
    started: bool,
}

impl Ticks {
    /// Create an uninitialized timer reading `clock`
    pub fn new(clock: Arc<dyn NativeClock>) -> Self {
        Self {
            clock,
            start: TimeVal::default(),
            started: false,
        }
    }

    /// Capture the tick origin; no-op while already running
    pub fn init(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.start = self.clock.now();
        tracing::debug!("Tick origin set to {:?}", self.start);
    }

    /// Stop the timer
    ///
    /// The stored origin is left in place; the next [`Ticks::get_ticks`]
    /// re-captures it through a lazy [`Ticks::init`].
    pub fn quit(&mut self) {
        self.started = false;
    }

    /// Whether the timer is running
    pub fn is_running(&self) -> bool {
        self.started
    }

    /// The stored tick origin
    pub fn origin(&self) -> TimeVal {
        self.start
    }

    /// Milliseconds since the origin, wrapping at 32 bits
    pub fn get_ticks(&mut self) -> u32 {
        if !self.started {
            self.init();
        }
        let now = self.clock.now();
        let elapsed_ms = (now.as_micros() - self.start.as_micros()) / 1000;
        elapsed_ms as u32
    }

    /// Millisecond fallback counter
    pub fn performance_counter(&mut self) -> u64 {
        u64::from(self.get_ticks())
    }

    /// Frequency of [`Ticks::performance_counter`], always 1000 Hz
    pub fn performance_frequency(&self) -> u64 {
        PERFORMANCE_FREQUENCY
    }

    /// Sleep the calling thread for at least `ms` milliseconds
    pub fn delay(&self, ms: u32) {
        delay(self.clock.as_ref(), ms);
    }
}

impl std::fmt::Debug for Ticks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticks")
            .field("start", &self.start)
            .field("started", &self.started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ManualClock;

    fn manual(start_micros: i64) -> (Arc<ManualClock>, Ticks) {
        let clock = Arc::new(ManualClock::new(start_micros));
        let ticks = Ticks::new(clock.clone());
        (clock, ticks)
    }

    #[test]
    fn test_delay_advances_ticks_on_real_clock() {
        let mut ticks = Ticks::new(psl1ght_native::Platform::hosted().clock);
        ticks.init();
        let before = ticks.get_ticks();
        ticks.delay(100);
        let after = ticks.get_ticks();
        assert!(after.wrapping_sub(before) >= 100);
    }

    #[test]
    fn test_init_is_idempotent() {
        let (clock, mut ticks) = manual(5_000_000);
        ticks.init();
        let origin = ticks.origin();

        clock.advance_ms(250);
        ticks.init();
        assert_eq!(ticks.origin(), origin);
        assert_eq!(ticks.get_ticks(), 250);
    }

    #[test]
    fn test_get_ticks_lazily_initializes() {
        let (clock, mut ticks) = manual(1_000_000);
        assert!(!ticks.is_running());
        assert_eq!(ticks.get_ticks(), 0);
        assert!(ticks.is_running());
        clock.advance_ms(42);
        assert_eq!(ticks.get_ticks(), 42);
    }

    #[test]
    fn test_quit_keeps_origin_until_reinit() {
        let (clock, mut ticks) = manual(0);
        ticks.init();
        let origin = ticks.origin();

        clock.advance_ms(1_000);
        ticks.quit();
        assert!(!ticks.is_running());
        assert_eq!(ticks.origin(), origin);

        // The next read re-captures the origin
        assert_eq!(ticks.get_ticks(), 0);
        assert_ne!(ticks.origin(), origin);
    }

    #[test]
    fn test_ticks_truncate_to_milliseconds() {
        let (clock, mut ticks) = manual(999_500);
        ticks.init();
        clock.advance_micros(900);
        assert_eq!(ticks.get_ticks(), 0);
        clock.advance_micros(100);
        assert_eq!(ticks.get_ticks(), 1);
    }

    #[test]
    fn test_ticks_wrap_at_32_bits() {
        let (clock, mut ticks) = manual(0);
        ticks.init();
        clock.advance_ms(u64::from(u32::MAX));
        let before_wrap = ticks.get_ticks();
        assert_eq!(before_wrap, u32::MAX);

        clock.advance_ms(10);
        let after_wrap = ticks.get_ticks();
        assert_eq!(after_wrap, 9);
        assert_eq!(after_wrap.wrapping_sub(before_wrap), 10);
        assert!(ticks_passed(after_wrap, before_wrap));
        assert!(!ticks_passed(before_wrap, after_wrap));
    }

    #[test]
    fn test_ticks_passed() {
        assert!(ticks_passed(100, 100));
        assert!(ticks_passed(101, 100));
        assert!(!ticks_passed(99, 100));
        assert!(ticks_passed(5, u32::MAX - 5));
        assert!(!ticks_passed(u32::MAX - 5, 5));
    }

    #[test]
    fn test_performance_counter_fallback() {
        let (clock, mut ticks) = manual(0);
        ticks.init();
        clock.advance_ms(1234);
        assert_eq!(ticks.performance_counter(), 1234);
        assert_eq!(ticks.performance_frequency(), 1000);
    }

    #[test]
    fn test_delay_requests_microseconds() {
        let (clock, ticks) = manual(0);
        ticks.delay(100);
        ticks.delay(5_000_000);
        assert_eq!(clock.sleeps(), vec![100_000, 5_000_000_000]);
    }
}
