//! 🧵 Workers: the ones who actually do the work while the Supervisor takes
//! all the credit in the sprint retro.
//!
//! - [`SourceWorker`]: reads lines, parses them, broadcasts validated batches.
//! - [`AggregationWorker`]: counts one dimension, ranks it when the channel closes.

use anyhow::Result;
use tokio::task::JoinHandle;

mod aggregation_worker;
mod source_worker;

pub(super) use aggregation_worker::AggregationWorker;
pub(crate) use source_worker::{IngestStats, SourceWorker};

/// 🏗️ A background worker, that does work. duh.
///
/// `start` consumes the worker and spawns it onto the runtime. The handle
/// resolves to whatever the worker produced once its input is exhausted.
pub(crate) trait Worker {
    type Output: Send + 'static;

    fn start(self) -> JoinHandle<Result<Self::Output>>;
}
