//! # Boxoffice Testing
//!
//! Testing utilities for reducers built on `boxoffice-core`.
//!
//! - [`FixedClock`] / [`test_clock`] for deterministic timestamps
//! - [`ReducerTest`] for Given/When/Then reducer tests
//! - [`assertions`] for inspecting returned effects
//! - [`init_test_tracing`] to see `tracing` output from a failing test

use chrono::{DateTime, TimeZone, Utc};
use boxoffice_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, TimeZone, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use boxoffice_testing::mocks::FixedClock;
    /// use boxoffice_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Fixed clock at 2026-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        let time = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        FixedClock::new(time)
    }
}

pub use mocks::{FixedClock, test_clock};

/// Install a test-writer `tracing` subscriber honouring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_fixed() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
