use chrono::{Datelike, FixedOffset, Offset, Utc};

/// Source of "now" for rules that depend on the calendar.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Wall clock read in a fixed UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Utc::now().with_timezone(&self.offset).year()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

/// Parses `Z`, `UTC`, or `±HH:MM`.
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }

    trimmed.parse::<FixedOffset>().ok()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Utc};

    use super::{parse_utc_offset, Clock, FixedClock, SystemClock};

    #[test]
    fn fixed_clock_reports_pinned_year() {
        assert_eq!(FixedClock(2017).current_year(), 2017);
    }

    #[test]
    fn parses_signed_offsets() {
        let eastern = parse_utc_offset("-05:00").expect("eastern offset");
        assert_eq!(eastern.local_minus_utc(), -5 * 3600);

        let india = parse_utc_offset("+05:30").expect("india offset");
        assert_eq!(india.local_minus_utc(), 5 * 3600 + 30 * 60);

        assert_eq!(parse_utc_offset("UTC").map(|offset| offset.local_minus_utc()), Some(0));
        assert_eq!(parse_utc_offset(" z ").map(|offset| offset.local_minus_utc()), Some(0));
        assert_eq!(parse_utc_offset("+00:00").map(|offset| offset.local_minus_utc()), Some(0));
    }

    #[test]
    fn rejects_malformed_offsets() {
        for value in ["", "05:00", "+5:00", "+24:00", "-05:60", "+-5:00", "America/New_York"] {
            assert!(parse_utc_offset(value).is_none(), "`{value}` should be rejected");
        }
    }

    #[test]
    fn system_clock_year_is_within_a_day_of_utc() {
        let clock = SystemClock::new(parse_utc_offset("-05:00").expect("offset"));
        let utc_year = Utc::now().year();
        let year = clock.current_year();

        assert!(year == utc_year || year == utc_year - 1);
    }
}
