//! Nullable clock: deterministic time for testing.

use staking_types::{Clock, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Shareable across threads so a
/// test can hold one handle while the engine holds another.
#[derive(Debug, Default)]
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    ///
    /// Setting a time earlier than the current reading breaks the
    /// monotonic contract of [`Clock`]; consumers treat it as zero elapsed time.
    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn advance_and_set() {
        let clock = NullClock::new(1_000);
        assert_eq!(clock.now(), Timestamp::new(1_000));
        clock.advance(10);
        assert_eq!(clock.now(), Timestamp::new(1_010));
        clock.set(5_000);
        assert_eq!(clock.now(), Timestamp::new(5_000));
    }

    #[test]
    fn concurrent_advances_all_land() {
        let clock = Arc::new(NullClock::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = clock.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        clock.advance(1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(clock.now(), Timestamp::new(800));
    }

    #[test]
    fn repeated_reads_are_stable() {
        let clock = NullClock::new(7);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn shared_handle_sees_advances() {
        let clock = Arc::new(NullClock::new(0));
        let as_dyn: Arc<dyn Clock> = clock.clone();
        clock.advance(30);
        assert_eq!(as_dyn.now(), Timestamp::new(30));
    }
}
