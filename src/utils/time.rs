// src/utils/time.rs

//! Clock abstraction and timestamp rendering.
//!
//! Both the upstream query date and the displayed event time depend on the
//! local timezone. Everything that needs "now" or a UTC offset goes through
//! a [`Clock`] so tests can pin both.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};

/// Display format for event timestamps.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current instant and of local UTC offsets.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Local UTC offset in effect at `instant`.
    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate {
        let now = self.now();
        now.with_timezone(&self.offset_at(now)).date_naive()
    }

    /// Render epoch milliseconds in local time, or `None` if out of range.
    fn display_millis(&self, epoch_millis: i64) -> Option<String> {
        let instant = DateTime::from_timestamp_millis(epoch_millis)?;
        let local = instant.with_timezone(&self.offset_at(instant));
        Some(local.format(DISPLAY_FORMAT).to_string())
    }
}

/// Process clock in the host's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }
}

/// Clock frozen at one instant in one fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Frozen clock in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn offset_at(&self, _instant: DateTime<Utc>) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn today_uses_local_offset() {
        // 23:30 UTC is already the next day in UTC+9.
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let clock = FixedClock::new(instant("2026-10-18T23:30:00Z"), tokyo);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let clock = FixedClock::utc(instant("2026-10-18T23:30:00Z"));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn display_millis_formats_in_offset() {
        let clock = FixedClock::utc(instant("2026-10-18T12:00:00Z"));
        assert_eq!(
            clock.display_millis(0).as_deref(),
            Some("1970-01-01 00:00:00")
        );

        let lima = FixedOffset::west_opt(5 * 3600).unwrap();
        let clock = FixedClock::new(instant("2026-10-18T12:00:00Z"), lima);
        assert_eq!(
            clock.display_millis(1_760_788_800_000).as_deref(),
            Some("2025-10-18 07:00:00")
        );
    }

    #[test]
    fn display_millis_rejects_out_of_range() {
        let clock = FixedClock::utc(instant("2026-10-18T12:00:00Z"));
        assert!(clock.display_millis(i64::MAX).is_none());
    }
}
