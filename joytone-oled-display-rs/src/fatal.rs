//! Fatal error reporting.
//!
//! A display that fails to initialise is never retried. The task parks in
//! [`report_forever`], emitting the same line at a fixed interval so the
//! failure stays visible on the debug log.

use core::fmt::{self, Write};

use embedded_hal_async::delay::DelayNs;
use heapless::String;

/// Interval between fatal error reports.
pub const FATAL_REPORT_PERIOD_MS: u32 = 2000;

/// `"Fatal error: <error>"`, truncated to 64 bytes.
pub fn fatal_message<E: fmt::Display>(error: &E) -> String<64> {
    let mut line = String::new();
    let _ = write!(line, "Fatal error: {}", error);
    line
}

/// Hand [`fatal_message`] of `error` to `emit` every
/// [`FATAL_REPORT_PERIOD_MS`], forever.
pub async fn report_forever<E, D, F>(error: E, delay: &mut D, mut emit: F) -> !
where
    E: fmt::Display,
    D: DelayNs,
    F: FnMut(&str),
{
    let line = fatal_message(&error);
    loop {
        emit(line.as_str());
        delay.delay_ms(FATAL_REPORT_PERIOD_MS).await;
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OledError;
    use embassy_futures::block_on;
    use embassy_futures::select::{select, Either};

    /// Counts sleeps and stops waking after `park_after` of them.
    struct ParkingDelay {
        calls: u32,
        total_ms: u64,
        park_after: u32,
    }

    impl DelayNs for ParkingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.delay_ms(ns / 1_000_000).await;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.calls += 1;
            self.total_ms += u64::from(ms);
            if self.calls >= self.park_after {
                core::future::pending::<()>().await;
            }
        }
    }

    #[test]
    fn message_names_the_error() {
        let line = fatal_message(&OledError::InitializationFailed);
        assert_eq!(line.as_str(), "Fatal error: OLED init failed");
    }

    #[test]
    fn long_messages_are_truncated_not_dropped() {
        struct Chatty;
        impl fmt::Display for Chatty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                for _ in 0..20 {
                    f.write_str("abcdefgh")?;
                }
                Ok(())
            }
        }
        let line = fatal_message(&Chatty);
        assert!(line.starts_with("Fatal error: abcdefgh"));
        assert!(line.len() <= 64);
    }

    #[test]
    fn reports_every_two_seconds_and_never_returns() {
        let mut delay = ParkingDelay {
            calls: 0,
            total_ms: 0,
            park_after: 5,
        };

        let mut reports = 0;
        let mut all_match = true;

        let result = block_on(select(
            report_forever(OledError::InitializationFailed, &mut delay, |line| {
                reports += 1;
                all_match &= line == "Fatal error: OLED init failed";
            }),
            core::future::ready(()),
        ));

        // One report before each sleep; the fifth sleep never ends.
        assert!(matches!(result, Either::Second(())));
        assert_eq!(reports, 5);
        assert!(all_match);
        assert_eq!(delay.calls, 5);
        assert_eq!(delay.total_ms, 5 * 2000);
    }
}
