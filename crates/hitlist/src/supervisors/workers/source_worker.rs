//! 🚰 The SourceWorker: first in, last to know how the charts turned out.
//!
//! Pulls raw lines from a [`Source`], runs each through the parser, and batches
//! the survivors. Every full batch is broadcast to every aggregation channel.
//! Rejected lines get a `warn!` with the line and the reason, in file order,
//! and the worker moves on. Nothing a single line does can stop it.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_channel::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Worker;
use crate::backends::Source;
use crate::common::{EventBatch, PlayEvent};
use crate::parser::{RejectReason, parse_line};

/// 📈 What the source worker saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct IngestStats {
    pub(crate) lines_read: u64,
    pub(crate) events_accepted: u64,
    pub(crate) lines_rejected: u64,
}

#[derive(Debug)]
pub(crate) struct SourceWorker<S> {
    source: S,
    outputs: Vec<Sender<EventBatch>>,
    batch_size: usize,
}

impl<S: Source> SourceWorker<S> {
    pub(crate) fn new(source: S, outputs: Vec<Sender<EventBatch>>, batch_size: usize) -> Self {
        Self {
            source,
            outputs,
            // -- 🔒 a zero batch would never fill. config validation says >= 1, this makes sure.
            batch_size: batch_size.max(1),
        }
    }
}

/// 📡 Hand the pending batch to every output. Same `Arc`, many readers.
///
/// A free function: holding `&SourceWorker` across an await would demand `S: Sync`.
async fn broadcast(
    outputs: &[Sender<EventBatch>],
    pending: &mut Vec<PlayEvent>,
    batch_size: usize,
) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }
    let batch: EventBatch = Arc::from(std::mem::replace(pending, Vec::with_capacity(batch_size)));
    debug!("📦 broadcasting batch of {} events", batch.len());
    for output in outputs {
        output
            .send(Arc::clone(&batch))
            .await
            .context("💀 an aggregation worker hung up mid-run")?;
    }
    Ok(())
}

impl<S: Source + 'static> Worker for SourceWorker<S> {
    type Output = IngestStats;

    fn start(mut self) -> JoinHandle<Result<IngestStats>> {
        tokio::spawn(async move {
            debug!("🚰 SourceWorker started reading...");
            let mut stats = IngestStats::default();
            let mut pending = Vec::with_capacity(self.batch_size);

            while let Some(raw) = self.source.next_line().await? {
                stats.lines_read += 1;
                let verdict = match std::str::from_utf8(&raw) {
                    Ok(line) => parse_line(line),
                    Err(_) => Err(RejectReason::NotUtf8),
                };

                match verdict {
                    Ok(event) => {
                        stats.events_accepted += 1;
                        pending.push(event);
                        if pending.len() >= self.batch_size {
                            broadcast(&self.outputs, &mut pending, self.batch_size).await?;
                        }
                    }
                    Err(reason) => {
                        stats.lines_rejected += 1;
                        warn!(
                            line_number = stats.lines_read,
                            line = %String::from_utf8_lossy(&raw),
                            reason = %reason,
                            "⚠️ rejected log line, skipping it"
                        );
                    }
                }
            }

            broadcast(&self.outputs, &mut pending, self.batch_size).await?;
            // -- 🏁 dropping the senders closes the channels. that's the "we're done" signal.
            drop(self.outputs);
            debug!("🏁 SourceWorker: source exhausted. {:?}", stats);
            Ok(stats)
        })
    }
}
