//! Default time-to-live assignment.
//!
//! A body's TTL is the last slot in which it may be included. When the
//! caller does not pick one, we take the current slot and add the
//! configured margin. The clock is injected so tests can pin "now".

use chrono::{DateTime, Utc};

use crate::config::SlotConfig;
use crate::error::{Result, TxError};

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The host's real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// A clock reading `secs` seconds after the Unix epoch, or `None` if
    /// `secs` is out of chrono's range.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `epoch_start_slot + whole seconds since epoch_start_timestamp + slot_margin`.
///
/// Fractional seconds are truncated.
///
/// # Errors
///
/// [`TxError::Clock`] if the clock reads earlier than the era start, the
/// start timestamp is unrepresentable, or the slot arithmetic overflows.
pub fn live_ttl<C: Clock + ?Sized>(slots: &SlotConfig, clock: &C) -> Result<u64> {
    let start = DateTime::<Utc>::from_timestamp(slots.epoch_start_timestamp, 0).ok_or_else(
        || {
            TxError::Clock(format!(
                "epoch start timestamp {} is out of range",
                slots.epoch_start_timestamp
            ))
        },
    )?;
    let now = clock.now();

    let elapsed = now.signed_duration_since(start).num_seconds();
    let elapsed = u64::try_from(elapsed).map_err(|_| {
        TxError::Clock(format!(
            "clock reads {} which is before the epoch start {}",
            now, start
        ))
    })?;

    slots
        .epoch_start_slot
        .checked_add(elapsed)
        .and_then(|slot| slot.checked_add(slots.slot_margin))
        .ok_or_else(|| TxError::Clock("slot number overflowed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DEFAULT_SLOT_MARGIN, MAINNET_SHELLEY_START_SLOT, MAINNET_SHELLEY_START_TIMESTAMP,
    };
    use chrono::Duration;

    #[test]
    fn ttl_at_epoch_start_is_start_slot_plus_margin() {
        let clock = FixedClock::from_unix(MAINNET_SHELLEY_START_TIMESTAMP).unwrap();
        let ttl = live_ttl(&SlotConfig::mainnet(), &clock).unwrap();
        assert_eq!(ttl, MAINNET_SHELLEY_START_SLOT + DEFAULT_SLOT_MARGIN);
    }

    #[test]
    fn ttl_advances_one_slot_per_second() {
        let clock = FixedClock::from_unix(MAINNET_SHELLEY_START_TIMESTAMP + 86_400).unwrap();
        let ttl = live_ttl(&SlotConfig::mainnet(), &clock).unwrap();
        assert_eq!(ttl, MAINNET_SHELLEY_START_SLOT + 86_400 + DEFAULT_SLOT_MARGIN);
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let base = FixedClock::from_unix(MAINNET_SHELLEY_START_TIMESTAMP + 10).unwrap();
        let later = FixedClock(base.0 + Duration::milliseconds(999));
        let slots = SlotConfig::mainnet();
        assert_eq!(
            live_ttl(&slots, &base).unwrap(),
            live_ttl(&slots, &later).unwrap()
        );
    }

    #[test]
    fn clock_before_epoch_start_is_an_error() {
        let clock = FixedClock::from_unix(MAINNET_SHELLEY_START_TIMESTAMP - 1).unwrap();
        assert!(matches!(
            live_ttl(&SlotConfig::mainnet(), &clock),
            Err(TxError::Clock(_))
        ));
    }

    #[test]
    fn slot_overflow_is_an_error() {
        let slots = SlotConfig {
            epoch_start_slot: u64::MAX,
            epoch_start_timestamp: 0,
            slot_margin: 1,
        };
        let clock = FixedClock::from_unix(0).unwrap();
        assert!(matches!(live_ttl(&slots, &clock), Err(TxError::Clock(_))));
    }

    #[test]
    fn unrepresentable_start_is_an_error() {
        let slots = SlotConfig {
            epoch_start_timestamp: i64::MAX,
            ..SlotConfig::mainnet()
        };
        assert!(matches!(
            live_ttl(&slots, &SystemClock),
            Err(TxError::Clock(_))
        ));
    }

    #[test]
    fn system_clock_is_past_shelley_start() {
        let ttl = live_ttl(&SlotConfig::mainnet(), &SystemClock).unwrap();
        assert!(ttl > MAINNET_SHELLEY_START_SLOT + DEFAULT_SLOT_MARGIN);
    }
}
