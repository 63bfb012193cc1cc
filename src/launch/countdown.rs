//! Phase countdown
//!
//! Time is pushed in by the owner rather than read from a clock, so phase
//! transitions can be driven by a real interval or stepped in tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Countdown over a fixed phase length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
    remaining: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    /// Consume `elapsed`. Returns the time left over past zero once expired.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Duration> {
        let carry = elapsed.checked_sub(self.remaining);
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            Some(carry.unwrap_or_default())
        } else {
            None
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Elapsed share of the phase, 0 to 100
    pub fn progress(&self) -> Decimal {
        if self.total.is_zero() {
            return dec!(100);
        }
        let elapsed = self.total - self.remaining;
        Decimal::from(elapsed.as_millis() as u64) * dec!(100) / Decimal::from(self.total.as_millis() as u64)
    }
}
