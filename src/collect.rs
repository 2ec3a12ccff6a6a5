//! # Collect
//!
//! Per-browser pipeline: locate, snapshot, extract. Every failure is folded
//! into a [`HistoryOutcome`] so one browser can never stop the other.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::export;
use crate::locator::{self, EnvSnapshot, LocateError, OsFamily};
use crate::parsers::browser::{Browser, HistoryRecord};
use crate::parsers::sqlite_db::{self, ExtractError};
use crate::report;
use crate::snapshot::{Snapshot, SnapshotError};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Copy(#[from] SnapshotError),
    #[error(transparent)]
    Query(#[from] ExtractError),
}

#[derive(Debug)]
pub enum HistoryOutcome {
    Found(Vec<HistoryRecord>),
    NotFound(LocateError),
    Failed(HistoryError),
}

impl HistoryOutcome {
    pub fn records(&self) -> &[HistoryRecord] {
        match self {
            HistoryOutcome::Found(records) => records,
            HistoryOutcome::NotFound(_) | HistoryOutcome::Failed(_) => &[],
        }
    }

    /// The `[!]` line shown to the user, if any.
    pub fn warning(&self, browser: Browser) -> Option<String> {
        match self {
            HistoryOutcome::Found(_) => None,
            HistoryOutcome::NotFound(_) => Some(format!(
                "[!] {} history database not found.",
                browser.short_name()
            )),
            HistoryOutcome::Failed(err) => Some(format!(
                "[!] Error accessing {} history: {err}",
                browser.short_name()
            )),
        }
    }
}

/// Everything a run needs besides configuration.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub os: OsFamily,
    pub env: EnvSnapshot,
    /// Directory that receives the temporary snapshots.
    pub scratch_dir: PathBuf,
}

impl RunContext {
    pub fn current(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            os: OsFamily::current(),
            env: EnvSnapshot::capture(),
            scratch_dir: scratch_dir.into(),
        }
    }
}

pub fn collect_history(browser: Browser, ctx: &RunContext, cfg: &Config) -> HistoryOutcome {
    let source = match locator::locate(browser, ctx.os, &ctx.env, cfg.firefox_profile) {
        Ok(path) => path,
        Err(err) => {
            debug!("{}: {err}", browser.short_name());
            return HistoryOutcome::NotFound(err);
        }
    };

    match read_snapshot(browser, &source, &ctx.scratch_dir, cfg) {
        Ok(records) => HistoryOutcome::Found(records),
        Err(err) => HistoryOutcome::Failed(err),
    }
}

fn read_snapshot(
    browser: Browser,
    source: &Path,
    scratch_dir: &Path,
    cfg: &Config,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let snapshot = Snapshot::create(browser, source, scratch_dir)?;
    debug!(
        "{}: reading {} byte snapshot",
        browser.short_name(),
        snapshot.byte_count()
    );
    let result = sqlite_db::extract_history(snapshot.path(), browser, cfg.order);
    snapshot.close();
    Ok(result?)
}

/// Processes every browser in turn, writing warnings and report sections to
/// `out`. Only write errors on `out` are returned.
pub fn run(
    out: &mut impl Write,
    ctx: &RunContext,
    cfg: &Config,
) -> io::Result<Vec<HistoryRecord>> {
    info!("run_id={} scratch={}", cfg.run_id, ctx.scratch_dir.display());
    let mut collected = Vec::new();

    for browser in Browser::ALL {
        let outcome = collect_history(browser, ctx, cfg);
        if let Some(line) = outcome.warning(browser) {
            writeln!(out, "{line}")?;
        }
        report::write_section(out, browser.display_name(), outcome.records())?;
        if let HistoryOutcome::Found(records) = outcome {
            info!("{}: {} records", browser.short_name(), records.len());
            collected.extend(records);
        }
    }

    if let Some(path) = &cfg.export_jsonl {
        match export::write_jsonl(path, &cfg.run_id, &collected) {
            Ok(count) => info!("exported {count} records to {}", path.display()),
            Err(err) => writeln!(out, "[!] {err}")?,
        }
    }
    Ok(collected)
}
