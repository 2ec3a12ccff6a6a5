//! Read-only viewer for local Chrome and Firefox browsing history.
//!
//! Each browser is processed in turn: [`locator`] finds the database,
//! [`snapshot`] copies it to a scratch file, [`parsers::sqlite_db`] reads the
//! copy and [`report`] prints fixed-width columns.

pub mod collect;
pub mod config;
pub mod export;
pub mod locator;
pub mod logging;
pub mod parsers;
pub mod report;
pub mod snapshot;
pub mod timestamp;
