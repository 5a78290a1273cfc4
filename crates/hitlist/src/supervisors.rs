//! 🎬 *[camera pans across a dimly lit server room at 00:00:01]*
//! 🎬 "In a world where one log file had to be counted twice..."
//! 🎬 "One supervisor dared to do it at the same time."
//!
//! 📦 The Supervisor wires the workers together and hovers:
//!
//! ```text
//!                              ┌──▶ channel ──▶ AggregationWorker<ByCountry>  ──┐
//!   Source ──▶ SourceWorker ───┤                                                ├──▶ Rankings
//!              (parse+batch)   └──▶ channel ──▶ AggregationWorker<ByListener> ──┘
//! ```
//!
//! Each validated batch is an `Arc<[PlayEvent]>`: both aggregation workers read
//! the same allocation, neither can touch the other's counts. Reports are only
//! written after ingestion finished cleanly, so a log that breaks halfway
//! through never produces half a report.
//!
//! ⚠️ DO NOT MAKE THE WORKERS PUB. They are the supervisor's private minions. 🦆

mod workers;
pub mod config;

use anyhow::{Context, Result};
use tracing::info;

use crate::backends::{Sink, Source};
use crate::common::{CountryCode, ListenerId};
use crate::leaderboards::{ByCountry, ByListener, GroupBy, Leaderboard};
use crate::reports::{self, ReportStats};
use config::RuntimeConfig;
use workers::{AggregationWorker, IngestStats, SourceWorker, Worker};

/// 🏆 Everything ingestion produced: the counters and both sets of leaderboards.
#[derive(Debug)]
pub(crate) struct Rankings {
    pub(crate) ingest: IngestStats,
    pub(crate) countries: Vec<Leaderboard<CountryCode>>,
    pub(crate) listeners: Vec<Leaderboard<ListenerId>>,
}

/// 📄 Both reports, written.
#[derive(Debug)]
pub(crate) struct Published {
    pub(crate) country: ReportStats,
    pub(crate) listener: ReportStats,
}

/// 📦 The Supervisor: spawns the workers, waits for them, hands back results.
pub(crate) struct Supervisor {
    runtime: RuntimeConfig,
}

impl Supervisor {
    pub(crate) fn new(runtime: RuntimeConfig) -> Self {
        Self { runtime }
    }

    /// 🧵 Read every line from `source`, count it in both dimensions, rank.
    ///
    /// Fails if the source fails mid-read or a worker panics. Malformed lines
    /// are not failures, they're counted in [`IngestStats::lines_rejected`].
    pub(crate) async fn rank<S>(&self, source: S) -> Result<Rankings>
    where
        S: Source + 'static,
    {
        let (country_tx, country_rx) = async_channel::bounded(self.runtime.queue_capacity);
        let (listener_tx, listener_rx) = async_channel::bounded(self.runtime.queue_capacity);

        let source_handle =
            SourceWorker::new(source, vec![country_tx, listener_tx], self.runtime.batch_size)
                .start();
        let country_handle =
            AggregationWorker::<ByCountry>::new(country_rx, self.runtime.leaderboard_size).start();
        let listener_handle =
            AggregationWorker::<ByListener>::new(listener_rx, self.runtime.leaderboard_size)
                .start();

        let (ingest, countries, listeners) =
            tokio::try_join!(source_handle, country_handle, listener_handle)
                .context("💀 a pipeline worker panicked. Nobody saw it coming. Everybody saw it go.")?;

        let ingest = ingest.context("💀 ingestion failed, no reports will be written")?;
        let countries = countries.context("💀 the country aggregation worker failed")?;
        let listeners = listeners.context("💀 the listener aggregation worker failed")?;

        info!(
            lines_read = ingest.lines_read,
            events_accepted = ingest.events_accepted,
            lines_rejected = ingest.lines_rejected,
            countries = countries.len(),
            listeners = listeners.len(),
            "🏆 leaderboards ranked"
        );

        Ok(Rankings {
            ingest,
            countries,
            listeners,
        })
    }

    /// 📄 Write both reports concurrently. Each sink is closed before returning.
    pub(crate) async fn publish<C, L>(
        &self,
        rankings: &Rankings,
        country_sink: &mut C,
        listener_sink: &mut L,
    ) -> Result<Published>
    where
        C: Sink,
        L: Sink,
    {
        let (country, listener) = tokio::try_join!(
            reports::write_report(country_sink, ByCountry::DIMENSION, &rankings.countries),
            reports::write_report(listener_sink, ByListener::DIMENSION, &rankings.listeners),
        )?;
        Ok(Published { country, listener })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::in_mem::{InMemorySink, InMemorySource};
    use crate::backends::{SinkBackend, SourceBackend};

    fn supervisor() -> Supervisor {
        // 🧪 tiny batches and queues so the channels actually get exercised
        Supervisor::new(RuntimeConfig {
            queue_capacity: 1,
            batch_size: 2,
            ..RuntimeConfig::default()
        })
    }

    async fn rank_and_publish(lines: &[&str]) -> Result<(Rankings, Vec<String>, Vec<String>)> {
        let supervisor = supervisor();
        let source = SourceBackend::InMemory(InMemorySource::new(lines.iter().copied()));
        let rankings = supervisor.rank(source).await?;

        let country = InMemorySink::new();
        let listener = InMemorySink::new();
        let mut country_sink = SinkBackend::InMemory(country.clone());
        let mut listener_sink = SinkBackend::InMemory(listener.clone());
        supervisor
            .publish(&rankings, &mut country_sink, &mut listener_sink)
            .await?;

        Ok((rankings, country.lines().await, listener.lines().await))
    }

    #[tokio::test]
    async fn the_one_where_the_multi_group_scenario_comes_out_right() -> Result<()> {
        let (_, country, listener) =
            rank_and_publish(&["1|10|FR", "1|10|FR", "2|10|FR", "1|20|DE"]).await?;

        assert_eq!(listener, vec!["10|1:2,2:1\n", "20|1:1\n"]);
        assert_eq!(country, vec!["FR|1:2,2:1\n", "DE|1:1\n"]);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_malformed_lines_are_tolerated_not_counted() -> Result<()> {
        let (rankings, country, listener) = rank_and_publish(&[
            "101|55|FR",
            "not_a_number|55|FR",
            "101|-3|FR",
            "102|55|FRA",
            "103|55|DE",
        ])
        .await?;

        assert_eq!(rankings.ingest.lines_read, 5);
        assert_eq!(rankings.ingest.events_accepted, 2);
        assert_eq!(rankings.ingest.lines_rejected, 3);
        assert_eq!(country, vec!["FR|101:1\n", "DE|103:1\n"]);
        assert_eq!(listener, vec!["55|101:1,103:1\n"]);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_every_valid_line_lands_in_both_dimensions() -> Result<()> {
        // 🧪 more lines than batch_size * queue_capacity, so back pressure is real
        let lines: Vec<String> = (0..500u64)
            .map(|i| format!("{}|{}|{}", i % 7 + 1, i % 13 + 1, if i % 2 == 0 { "FR" } else { "BE" }))
            .collect();
        let supervisor = supervisor();
        let source = SourceBackend::InMemory(InMemorySource::new(lines));
        let rankings = supervisor.rank(source).await?;

        fn total<K>(boards: &[Leaderboard<K>]) -> u64 {
            boards
                .iter()
                .flat_map(|board| board.entries.iter().map(|entry| entry.count))
                .sum()
        }
        assert_eq!(rankings.ingest.events_accepted, 500);
        assert_eq!(total(&rankings.countries), 500);
        assert_eq!(total(&rankings.listeners), 500);
        assert_eq!(rankings.countries.len(), 2);
        assert_eq!(rankings.listeners.len(), 13);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_silence_produces_empty_reports() -> Result<()> {
        let (rankings, country, listener) = rank_and_publish(&[]).await?;
        assert_eq!(rankings.ingest.lines_read, 0);
        assert!(country.is_empty());
        assert!(listener.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_invalid_utf8_is_just_another_bad_line() -> Result<()> {
        let supervisor = supervisor();
        let lines: Vec<Vec<u8>> = vec![b"1|2|FR".to_vec(), vec![b'1', b'|', 0xff, b'|', b'F', b'R']];
        let rankings = supervisor
            .rank(SourceBackend::InMemory(InMemorySource::new(lines)))
            .await?;
        assert_eq!(rankings.ingest.events_accepted, 1);
        assert_eq!(rankings.ingest.lines_rejected, 1);
        Ok(())
    }
}
