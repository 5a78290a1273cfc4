//! 🧮 The AggregationWorker: drains a channel of event batches into a
//! [`PlayCounts`] table and, when the channel closes, ranks every group.
//!
//! One instance per dimension. It owns its counts outright, so two of them can
//! run side by side over the same batches without a single lock. 🦆

use std::marker::PhantomData;

use anyhow::Result;
use async_channel::Receiver;
use tokio::task::JoinHandle;
use tracing::debug;

use super::Worker;
use crate::common::EventBatch;
use crate::leaderboards::{GroupBy, Leaderboard, PlayCounts};

#[derive(Debug)]
pub(crate) struct AggregationWorker<G> {
    rx: Receiver<EventBatch>,
    leaderboard_size: usize,
    _dimension: PhantomData<G>,
}

impl<G: GroupBy> AggregationWorker<G> {
    pub(crate) fn new(rx: Receiver<EventBatch>, leaderboard_size: usize) -> Self {
        Self {
            rx,
            leaderboard_size,
            _dimension: PhantomData,
        }
    }
}

impl<G> Worker for AggregationWorker<G>
where
    G: GroupBy + Send + 'static,
{
    type Output = Vec<Leaderboard<G::Key>>;

    fn start(self) -> JoinHandle<Result<Self::Output>> {
        tokio::spawn(async move {
            debug!(dimension = G::DIMENSION, "🧮 AggregationWorker started counting...");
            let mut counts = PlayCounts::<G>::new();

            // -- 🔄 recv() errors only once the channel is empty AND closed. that's our cue.
            while let Ok(batch) = self.rx.recv().await {
                counts.record_all(batch.iter());
            }

            debug!(
                dimension = G::DIMENSION,
                groups = counts.group_count(),
                events = counts.recorded(),
                "🏁 channel closed, ranking"
            );
            Ok(counts.into_leaderboards(self.leaderboard_size))
        })
    }
}
