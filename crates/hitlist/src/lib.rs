//! 🎧 hitlist: turn a day of listen events into two top-50 charts.
//!
//! 🎬 *[narrator voice]* "Every night, at the stroke of midnight, one log file
//! closes and two reports are born."
//!
//! ```text
//!   listen-YYYYMMDD.log ──▶ parse ──▶ count ──┬──▶ country_top50YYYYMMDD.txt
//!                                             └──▶ user_top50YYYYMMDD.txt
//! ```
//!
//! 🧠 Knowledge graph:
//! - [`parser`]: one raw line → one [`PlayEvent`], or a reason it isn't one.
//! - [`leaderboards`]: per-group song counts and the top-K ranking.
//! - [`reports`]: leaderboards → `group|song:count,...` lines.
//! - [`paths`] + [`schedule`]: which files, and when.
//! - [`run`]: one day, start to finish. Everything else is plumbing. 🦆

pub mod app_config;
pub mod leaderboards;
pub mod parser;
pub mod paths;
pub mod reports;
pub mod schedule;

pub(crate) mod backends;
mod common;
mod progress;
mod supervisors;

use anyhow::Result;
use tracing::info;

use crate::backends::file::{FileSink, FileSource};
use crate::backends::{SinkBackend, SourceBackend};
use crate::reports::ReportStats;
use crate::supervisors::Supervisor;

pub use common::{CountryCode, ListenerId, PlayEvent, SongId};
pub use paths::{PathsConfig, RunPaths};
pub use supervisors::config::RuntimeConfig;

/// 📋 How one run went, for whoever is printing the table at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: u64,
    pub events_accepted: u64,
    pub lines_rejected: u64,
    pub country: ReportStats,
    pub listener: ReportStats,
}

/// 🚀 Process one day: read `paths.input`, write both reports.
///
/// 🔧 Steps:
/// 1. Open the log. Missing → error, and no report file is touched.
/// 2. Parse, count, and rank everything. A read that breaks midway → error,
///    still no report file touched.
/// 3. Open both report files, then truncate and write them. If either one
///    can't be opened, neither loses its old contents.
///
/// Same input, same bytes out. Rerunning a day overwrites its reports.
pub async fn run(paths: &RunPaths, runtime: &RuntimeConfig) -> Result<RunSummary> {
    info!(input = %paths.input.display(), "🎧 starting run");

    let source = SourceBackend::File(FileSource::new(&paths.input).await?);
    let supervisor = Supervisor::new(runtime.clone());
    let rankings = supervisor.rank(source).await?;

    // 📄 only now do the report files come into existence. open both, then clear both.
    let mut country_file = FileSink::open(&paths.country_report).await?;
    let mut listener_file = FileSink::open(&paths.listener_report).await?;
    country_file.truncate().await?;
    listener_file.truncate().await?;

    let mut country_sink = SinkBackend::File(country_file);
    let mut listener_sink = SinkBackend::File(listener_file);
    let published = supervisor
        .publish(&rankings, &mut country_sink, &mut listener_sink)
        .await?;

    info!(
        country_report = %paths.country_report.display(),
        listener_report = %paths.listener_report.display(),
        "✅ reports written"
    );

    Ok(RunSummary {
        lines_read: rankings.ingest.lines_read,
        events_accepted: rankings.ingest.events_accepted,
        lines_rejected: rankings.ingest.lines_rejected,
        country: published.country,
        listener: published.listener,
    })
}
