//! 🔧 Runtime knobs for the supervisor and its workers.
//!
//! Lives next to the supervisor that reads it. When something in the pipeline
//! feels too slow or too hungry, this is the first file to open.

use serde::Deserialize;

use crate::leaderboards::DEFAULT_LEADERBOARD_SIZE;

/// 🎛️ How the pipeline behaves at runtime.
///
/// 🧠 Knowledge graph:
/// - `queue_capacity`: batches buffered per aggregation worker. Back pressure
///   kicks in when a worker falls behind, so memory stays bounded.
/// - `batch_size`: validated events per broadcast batch. Bigger = fewer channel
///   hops, more memory in flight.
/// - `leaderboard_size`: K. Fifty, unless someone has opinions.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

fn default_queue_capacity() -> usize {
    10
}

// 📦 10k events ≈ a few hundred KiB per batch. Chosen by staring at it until it felt right.
fn default_batch_size() -> usize {
    10_000
}

fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            batch_size: default_batch_size(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}
