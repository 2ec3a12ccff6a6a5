use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;
use tracing::debug;

use crate::config::RecordOrder;
use crate::parsers::browser::{Browser, HistoryRecord};
use crate::timestamp::{decode_chrome, decode_firefox};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Runs the browser's history query against `path` (a snapshot) and decodes
/// every row. Rows keep storage order unless `order` asks otherwise.
pub fn extract_history(
    path: &Path,
    browser: Browser,
    order: RecordOrder,
) -> Result<Vec<HistoryRecord>, ExtractError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let mut out = query_history(&conn, browser)?;
    drop(conn);

    debug!("{} rows from {}", out.len(), browser.short_name());
    if order == RecordOrder::LastVisitDesc {
        sort_by_last_visit_desc(&mut out);
    }
    Ok(out)
}

fn query_history(
    conn: &Connection,
    browser: Browser,
) -> Result<Vec<HistoryRecord>, ExtractError> {
    let mut out = Vec::new();
    let mut stmt = conn.prepare(browser.history_query())?;
    let rows = stmt.query_map([], |row| {
        let url: String = row.get(0)?;
        let title: Option<String> = row.get(1)?;
        let visit_count: Option<i64> = row.get(2)?;
        let last_visit: Option<i64> = row.get(3)?;
        Ok((url, title, visit_count, last_visit))
    })?;

    for row in rows {
        let (url, title, visit_count, raw_last_visit) = row?;
        let last_visit = match browser {
            Browser::Chrome => decode_chrome(raw_last_visit),
            Browser::Firefox => decode_firefox(raw_last_visit),
        };
        out.push(HistoryRecord {
            browser,
            url,
            title,
            visit_count: visit_count.unwrap_or(0).max(0) as u64,
            last_visit,
            raw_last_visit,
        });
    }

    Ok(out)
}

/// Most recent first; rows without a stored time go last. Stable, so ties keep
/// storage order.
pub fn sort_by_last_visit_desc(records: &mut [HistoryRecord]) {
    records.sort_by(|a, b| {
        let key = |r: &HistoryRecord| r.raw_last_visit.filter(|t| *t > 0);
        key(b).cmp(&key(a))
    });
}
