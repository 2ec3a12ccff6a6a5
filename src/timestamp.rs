//! # Timestamp decoding
//!
//! Chrome stores WebKit time (microseconds since 1601-01-01), Firefox stores
//! PRTime (microseconds since the Unix epoch). Both decoders are total: bad
//! input maps to a sentinel instead of an error.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta};

use crate::parsers::browser::VisitTime;

pub fn chrome_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1601, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Decodes a Chrome `last_visit_time`. The result is UTC wall-clock time,
/// without zone conversion.
pub fn decode_chrome(raw: Option<i64>) -> VisitTime {
    let Some(micros) = raw else {
        return VisitTime::Invalid;
    };
    if micros <= 0 {
        return VisitTime::Invalid;
    }
    chrome_epoch()
        .checked_add_signed(TimeDelta::microseconds(micros))
        .map(VisitTime::At)
        .unwrap_or(VisitTime::Invalid)
}

/// Decodes a Firefox `last_visit_date` into local time.
pub fn decode_firefox(raw: Option<i64>) -> VisitTime {
    match raw {
        None | Some(0) => VisitTime::Unknown,
        Some(micros) => DateTime::from_timestamp_micros(micros)
            .map(|utc| VisitTime::At(utc.with_timezone(&Local).naive_local()))
            .unwrap_or(VisitTime::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn chrome_round_trips_through_the_1601_epoch() {
        let samples = [
            1i64,
            999_999,
            11_644_473_600_000_000,
            13_270_000_000_000_000,
            13_303_449_600_123_456,
            13_390_000_000_000_001,
        ];
        for raw in samples {
            let decoded = decode_chrome(Some(raw)).as_datetime().expect("valid");
            let back = (decoded - chrome_epoch()).num_microseconds();
            assert_eq!(back, Some(raw), "raw={raw}");
        }
    }

    #[test]
    fn chrome_known_value() {
        let decoded = decode_chrome(Some(13_270_000_000_000_000));
        assert_eq!(decoded.to_string(), "2021-07-05 23:06:40");
    }

    #[test]
    fn chrome_unix_epoch_offset() {
        let decoded = decode_chrome(Some(11_644_473_600_000_000));
        assert_eq!(decoded.to_string(), "1970-01-01 00:00:00");
    }

    #[test]
    fn chrome_sentinels() {
        assert_eq!(decode_chrome(None), VisitTime::Invalid);
        assert_eq!(decode_chrome(Some(0)), VisitTime::Invalid);
        assert_eq!(decode_chrome(Some(-5)), VisitTime::Invalid);
        assert_eq!(decode_chrome(Some(i64::MAX)), VisitTime::Invalid);
    }

    #[test]
    fn firefox_matches_unix_micros_in_local_time() {
        for raw in [1i64, 1_000_000, 1_700_000_000_000_000, 1_625_526_400_654_321] {
            let decoded = decode_firefox(Some(raw)).as_datetime().expect("valid");
            let local = Local
                .from_local_datetime(&decoded)
                .earliest()
                .expect("local time exists");
            assert_eq!(local.timestamp_micros(), raw, "raw={raw}");
        }
    }

    #[test]
    fn firefox_zero_or_missing_is_unknown() {
        assert_eq!(decode_firefox(None), VisitTime::Unknown);
        assert_eq!(decode_firefox(Some(0)), VisitTime::Unknown);
    }

    #[test]
    fn firefox_out_of_range_is_invalid() {
        assert_eq!(decode_firefox(Some(i64::MAX)), VisitTime::Invalid);
        assert_eq!(decode_firefox(Some(i64::MIN)), VisitTime::Invalid);
    }
}
