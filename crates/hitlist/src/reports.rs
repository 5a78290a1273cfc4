//! 🎼 Reports: leaderboards in, `group|song:count,song:count,...` lines out.
//!
//! ```text
//!   Leaderboard { FR, [(1,2), (2,1)] } ──compose_line──▶ "FR|1:2,2:1\n" ──sink.send──▶ 📄
//! ```
//!
//! 🧠 Knowledge graph:
//! - `compose_line` is pure formatting. No I/O. Easy to test, hard to break.
//! - `write_report` drives a sink: one line per group, in leaderboard order.
//! - A group that fails to format or write is skipped and logged. The rest of
//!   the report still ships. One bad group never sinks the whole file.
//! - Empty leaderboards produce no line at all, and no complaint either.

use std::fmt::{self, Display, Write as _};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::backends::Sink;
use crate::leaderboards::Leaderboard;

/// 💀 Why one group's line didn't make it into the report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to format the leaderboard line for group {group}")]
    Format {
        group: String,
        #[source]
        source: fmt::Error,
    },

    #[error("failed to write the leaderboard line for group {group}: {reason}")]
    Write { group: String, reason: String },
}

/// 📈 What happened while writing one report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub dimension: &'static str,
    pub groups: usize,
    pub lines_written: usize,
    pub groups_skipped: usize,
}

/// 🎼 Render one leaderboard as a report line, trailing `\n` included.
///
/// `Ok(None)` when the leaderboard has no entries: nothing to say, so we don't.
pub fn compose_line<K: Display>(board: &Leaderboard<K>) -> Result<Option<String>, ReportError> {
    let Some((first, rest)) = board.entries.split_first() else {
        return Ok(None);
    };

    let failed = |source| ReportError::Format {
        group: board.group.to_string(),
        source,
    };

    // 🧮 "song:count," is rarely more than a dozen bytes. vibes-based, but close.
    let mut line = String::with_capacity(16 + board.entries.len() * 12);
    write!(line, "{}|{}:{}", board.group, first.song_id, first.count).map_err(failed)?;
    for entry in rest {
        write!(line, ",{}:{}", entry.song_id, entry.count).map_err(failed)?;
    }
    line.push('\n');
    Ok(Some(line))
}

/// 📥 Write every leaderboard to the sink, one line each, then close the sink.
///
/// Per-group failures are logged at `warn` and counted in
/// [`ReportStats::groups_skipped`]. Only a failed close (the final flush)
/// fails the whole report.
pub(crate) async fn write_report<K, S>(
    sink: &mut S,
    dimension: &'static str,
    boards: &[Leaderboard<K>],
) -> Result<ReportStats>
where
    K: Display + Sync,
    S: Sink,
{
    let mut stats = ReportStats {
        dimension,
        groups: boards.len(),
        ..ReportStats::default()
    };

    for board in boards {
        let outcome = match compose_line(board) {
            Ok(None) => continue,
            Ok(Some(line)) => sink.send(line).await.map_err(|err| ReportError::Write {
                group: board.group.to_string(),
                reason: format!("{err:#}"),
            }),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => stats.lines_written += 1,
            Err(err) => {
                warn!(dimension, group = %board.group, error = %err, "⚠️ skipping leaderboard group, some data will be missing from the report");
                stats.groups_skipped += 1;
            }
        }
    }

    sink.close()
        .await
        .context(format!("💀 failed to finalize the {dimension} report"))?;

    debug!(
        dimension,
        lines_written = stats.lines_written,
        groups_skipped = stats.groups_skipped,
        "📄 report written"
    );
    Ok(stats)
}
