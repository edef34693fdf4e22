//! Parsing of wire timestamps into [`OffsetDateTime`].
//!
//! Accepted forms, tried in order:
//!
//! - epoch milliseconds, as a JSON number or an all-digit string;
//! - RFC 3339 (what the exporter writes, fractional seconds optional);
//! - other ISO-8601 forms that carry an offset;
//! - ISO-8601 local date-times and bare dates, read as UTC.

use folio_api_types::WireTimestamp;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{
        FormatItem,
        well_known::{Iso8601, Rfc3339},
    },
    macros::format_description,
};

use super::error::DomainError;

const LOCAL_DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const LOCAL_DATETIME_FRACTION_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse `raw` into a structured timestamp, naming `field` in the error.
pub fn parse(field: &'static str, raw: &WireTimestamp) -> Result<OffsetDateTime, DomainError> {
    match raw {
        WireTimestamp::Millis(millis) => from_millis(*millis),
        WireTimestamp::Text(text) => parse_text(text.trim()),
    }
    .ok_or_else(|| DomainError::invalid_timestamp(field, raw))
}

fn parse_text(text: &str) -> Option<OffsetDateTime> {
    if text.is_empty() {
        return None;
    }
    if is_epoch_digits(text) {
        return text.parse::<i64>().ok().and_then(from_millis);
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(text, &Iso8601::DEFAULT))
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(text, LOCAL_DATETIME_FRACTION_FORMAT)
                .or_else(|_| PrimitiveDateTime::parse(text, LOCAL_DATETIME_FORMAT))
                .map(PrimitiveDateTime::assume_utc)
                .ok()
        })
        .or_else(|| {
            Date::parse(text, DATE_FORMAT)
                .map(|date| date.midnight().assume_utc())
                .ok()
        })
}

fn is_epoch_digits(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn from_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}
