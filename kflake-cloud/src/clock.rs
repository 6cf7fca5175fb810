//! clocks that generators read timestamps from
//!
//! [`SystemClock`] is what generators use by default. [`ManualClock`] only
//! moves when told to, which makes the output of a generator predictable.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use kflake_core::traits::Clock;
use kflake_flake::EPOCH_MILLIS;

/// reads the wall clock through [`SystemTime`]
///
/// a system time before the id epoch reads as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        let epoch = SystemTime::UNIX_EPOCH + Duration::from_millis(EPOCH_MILLIS);

        match SystemTime::now().duration_since(epoch) {
            Ok(elapsed) => elapsed.as_millis() as u64,
            Err(_) => 0,
        }
    }
}

/// a clock that is set by hand
///
/// clones share the same time so one handle can be given to a generator
/// while another is kept to move time around.
///
/// ```rust
/// use kflake_cloud::clock::ManualClock;
/// use kflake_cloud::sync::MutexGenerator;
///
/// let clock = ManualClock::new(4_999);
/// let gen = MutexGenerator::with_clock(3, clock.clone());
///
/// clock.set(5_000);
///
/// assert_eq!(gen.next_id().id(), (5_000 << 23) | (3 << 13));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// creates a clock stopped at the given milliseconds since the id epoch
    pub fn new(millis: u64) -> Self {
        ManualClock {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// moves the clock to the given millisecond, backwards is allowed
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// moves the clock forward by the given amount of milliseconds
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn system_clock_is_past_epoch() {
        // 2024/01/01 00:00:00 UTC relative to the id epoch
        let min = 1_704_067_200_000 - EPOCH_MILLIS;

        assert!(SystemClock.now() > min);
    }

    #[test]
    fn manual_clock_shares_time() {
        let clock = ManualClock::new(10);
        let other = clock.clone();

        other.advance(5);
        assert_eq!(clock.now(), 15);

        clock.set(3);
        assert_eq!(other.now(), 3);
    }
}
