use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
}

impl Browser {
    /// Processing order of a full run.
    pub const ALL: [Browser; 2] = [Browser::Chrome, Browser::Firefox];

    /// Short name used in warning lines.
    pub fn short_name(self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
        }
    }

    /// Name used in report section headers.
    pub fn display_name(self) -> &'static str {
        match self {
            Browser::Chrome => "Google Chrome",
            Browser::Firefox => "Mozilla Firefox",
        }
    }

    /// Fixed prefix of the scratch snapshot file name.
    pub fn snapshot_prefix(self) -> &'static str {
        match self {
            Browser::Chrome => "temp_chrome_history",
            Browser::Firefox => "temp_firefox_history",
        }
    }

    pub fn history_query(self) -> &'static str {
        match self {
            Browser::Chrome => "SELECT url, title, visit_count, last_visit_time FROM urls",
            Browser::Firefox => {
                "SELECT url, title, visit_count, last_visit_date FROM moz_places"
            }
        }
    }
}

/// Decoded last-visit time, or the sentinel shown when decoding is impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitTime {
    At(chrono::NaiveDateTime),
    Unknown,
    Invalid,
}

impl VisitTime {
    #[cfg(test)]
    pub fn as_datetime(&self) -> Option<chrono::NaiveDateTime> {
        match self {
            VisitTime::At(dt) => Some(*dt),
            VisitTime::Unknown | VisitTime::Invalid => None,
        }
    }
}

impl fmt::Display for VisitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitTime::At(dt) => {
                if dt.and_utc().timestamp_subsec_micros() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f"))
                }
            }
            VisitTime::Unknown => f.write_str("Unknown"),
            VisitTime::Invalid => f.write_str("Invalid timestamp"),
        }
    }
}

impl Serialize for VisitTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub browser: Browser,
    pub url: String,
    pub title: Option<String>,
    pub visit_count: u64,
    pub last_visit: VisitTime,
    /// Stored value before decoding, kept for ordering and export.
    pub raw_last_visit: Option<i64>,
}
