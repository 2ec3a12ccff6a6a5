//! Shared fixtures for history tests.
//!
//! Builds a fake home directory with the Linux profile layout and real SQLite
//! databases using the browsers' table shapes.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use historyview::collect::RunContext;
use historyview::config::{Config, ProfileSelection, RecordOrder};
use historyview::locator::{EnvSnapshot, OsFamily};

// ============================================================================
// Row Types
// ============================================================================

/// (url, title, visit_count, stored last-visit value)
pub type Row<'a> = (&'a str, Option<&'a str>, i64, Option<i64>);

// ============================================================================
// Fake Home
// ============================================================================

pub struct FakeHome {
    pub home: TempDir,
    pub scratch: TempDir,
}

impl FakeHome {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("home"),
            scratch: tempfile::tempdir().expect("scratch"),
        }
    }

    pub fn context(&self) -> RunContext {
        RunContext {
            os: OsFamily::Other,
            env: EnvSnapshot::with_home(self.home.path()),
            scratch_dir: self.scratch.path().to_path_buf(),
        }
    }

    pub fn chrome_history_path(&self) -> PathBuf {
        self.home
            .path()
            .join(".config")
            .join("google-chrome")
            .join("Default")
            .join("History")
    }

    pub fn firefox_profile_dir(&self, name: &str) -> PathBuf {
        self.home.path().join(".mozilla").join("firefox").join(name)
    }

    pub fn with_chrome(&self, rows: &[Row<'_>]) -> PathBuf {
        let path = self.chrome_history_path();
        fs::create_dir_all(path.parent().expect("parent")).expect("chrome dirs");
        write_chrome_db(&path, rows);
        path
    }

    pub fn with_firefox(&self, profile: &str, rows: &[Row<'_>]) -> PathBuf {
        let dir = self.firefox_profile_dir(profile);
        fs::create_dir_all(&dir).expect("firefox dirs");
        let path = dir.join("places.sqlite");
        write_firefox_db(&path, rows);
        path
    }

    pub fn with_firefox_wal(&self, profile: &str, rows: &[Row<'_>]) -> PathBuf {
        let dir = self.firefox_profile_dir(profile);
        fs::create_dir_all(&dir).expect("firefox dirs");
        let path = dir.join("places.sqlite");
        write_firefox_wal_db(&path, rows);
        path
    }

    /// Files left behind in the scratch directory.
    pub fn scratch_leftovers(&self) -> Vec<String> {
        fs::read_dir(self.scratch.path())
            .expect("read scratch")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect()
    }
}

// ============================================================================
// Database Builders
// ============================================================================

pub fn write_chrome_db(path: &Path, rows: &[Row<'_>]) {
    let conn = Connection::open(path).expect("conn");
    conn.execute_batch(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY AUTOINCREMENT, url LONGVARCHAR, \
         title LONGVARCHAR, visit_count INTEGER DEFAULT 0 NOT NULL, \
         typed_count INTEGER DEFAULT 0 NOT NULL, last_visit_time INTEGER NOT NULL, \
         hidden INTEGER DEFAULT 0 NOT NULL);",
    )
    .expect("create urls");
    for (url, title, visits, last) in rows {
        conn.execute(
            "INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES (?1, ?2, ?3, ?4)",
            (url, title, visits, last.unwrap_or(0)),
        )
        .expect("insert url");
    }
}

pub fn write_firefox_db(path: &Path, rows: &[Row<'_>]) {
    let conn = Connection::open(path).expect("conn");
    conn.execute_batch(
        "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
         rev_host LONGVARCHAR, visit_count INTEGER DEFAULT 0, hidden INTEGER DEFAULT 0 NOT NULL, \
         typed INTEGER DEFAULT 0 NOT NULL, frecency INTEGER DEFAULT -1 NOT NULL, \
         last_visit_date INTEGER);",
    )
    .expect("create moz_places");
    for (url, title, visits, last) in rows {
        conn.execute(
            "INSERT INTO moz_places (url, title, visit_count, last_visit_date) VALUES (?1, ?2, ?3, ?4)",
            (url, title, visits, last),
        )
        .expect("insert place");
    }
}

/// Same as [`write_firefox_db`], but the file is left in WAL journal mode the
/// way Firefox keeps `places.sqlite`.
pub fn write_firefox_wal_db(path: &Path, rows: &[Row<'_>]) {
    {
        let conn = Connection::open(path).expect("conn");
        let mode: String = conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .expect("journal_mode");
        assert_eq!(mode, "wal");
    }
    write_firefox_db(path, rows);
}

// ============================================================================
// Helpers
// ============================================================================

pub fn test_config() -> Config {
    Config {
        run_id: "test_run".to_string(),
        order: RecordOrder::Natural,
        firefox_profile: ProfileSelection::InstallDefault,
        export_jsonl: None,
    }
}

pub fn run_to_string(fake: &FakeHome, cfg: &Config) -> String {
    let mut buf = Vec::new();
    historyview::collect::run(&mut buf, &fake.context(), cfg).expect("run");
    String::from_utf8(buf).expect("utf8 output")
}
