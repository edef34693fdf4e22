use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use time::{OffsetDateTime, UtcOffset};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    let utc = time.to_offset(UtcOffset::UTC);
    let datetime_utc = DateTime::<Utc>::from_timestamp(utc.unix_timestamp(), utc.nanosecond())?;
    Some(tz.from_utc_datetime(&datetime_utc.naive_utc()))
}

/// The same instant, shifted to the offset `tz` observes at that instant.
///
/// Instants chrono cannot represent are returned unchanged.
pub fn localize(time: OffsetDateTime, tz: Tz) -> OffsetDateTime {
    let Some(local) = localized_datetime(time, tz) else {
        return time;
    };
    UtcOffset::from_whole_seconds(local.offset().fix().local_minus_utc())
        .ok()
        .and_then(|offset| time.checked_to_offset(offset))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use time::macros::{datetime, offset};

    use super::*;

    #[test]
    fn follows_daylight_saving() {
        let summer = localize(datetime!(2013-05-06 21:40:00 UTC), Tz::Europe__London);
        assert_eq!(summer.offset(), offset!(+1));
        assert_eq!(summer.hour(), 22);

        let winter = localize(datetime!(2013-12-06 21:40:00 UTC), Tz::Europe__London);
        assert_eq!(winter.offset(), offset!(UTC));
        assert_eq!(winter.hour(), 21);
    }

    #[test]
    fn keeps_the_instant() {
        let at = datetime!(2024-01-01 00:30:00 +02:00);
        let tokyo = localize(at, Tz::Asia__Tokyo);
        assert_eq!(tokyo, at);
        assert_eq!(tokyo.offset(), offset!(+9));
        assert_eq!(tokyo.hour(), 7);
    }

    #[test]
    fn utc_zone_normalizes_offsets() {
        let at = localize(datetime!(2024-01-01 08:00:00 -05:00), Tz::UTC);
        assert_eq!(at.offset(), offset!(UTC));
        assert_eq!(at.hour(), 13);
    }
}
