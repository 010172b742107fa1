//! Wall clock and sleep on top of std

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use psl1ght_sdk::TimeVal;

use crate::platform::NativeClock;

/// System wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct HostedClock;

impl NativeClock for HostedClock {
    fn now(&self) -> TimeVal {
        // A clock set before 1970 reads as the epoch itself
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        TimeVal::new(
            since_epoch.as_secs() as i64,
            i64::from(since_epoch.subsec_micros()),
        )
    }

    fn usleep(&self, usec: u64) {
        std::thread::sleep(Duration::from_micros(usec));
    }
}
