//! 🏆 Leaderboards: count every play, then crown the top K per group.
//!
//! 🎬 *[a stadium. two scoreboards. one says COUNTRY, one says LISTENER.]*
//! *[the crowd is 40 million log lines. they all want to be song #1.]*
//!
//! ```text
//!   PlayEvent ──▶ GroupBy::key_of ──▶ PlayCounts ──(stream ends)──▶ top_k ──▶ Leaderboard
//!                  (country|listener)   group → song → count          exact, K per group
//! ```
//!
//! 🧠 Knowledge graph:
//! - Grouping dimensions are zero-sized marker types ([`ByCountry`], [`ByListener`]).
//!   The compiler monomorphizes each one. No trait objects, no vtables.
//! - Counting is one hash bump per event. Selection happens once, at the end,
//!   with `select_nth_unstable_by`, then only the kept K get sorted.
//! - Groups come out in first-seen order. A `Vec` remembers the order, a `HashMap`
//!   remembers where each group sits in the `Vec`.
//! - Ranking: count descending, then `song_id` ascending. Ties at the cutoff go
//!   to the lower song id. Every run over the same file gives the same answer.
//!
//! ⚠️ The full count table lives until extraction. Evicting early could drop a
//! song that would have made the cut. We don't do that. 🦆

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::common::{CountryCode, ListenerId, PlayEvent, SongId};

/// 🔢 The default size of a leaderboard. Fifty. Like the states, or the hits.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 50;

/// 🧭 A grouping dimension: which leaderboard does an event belong to?
pub trait GroupBy {
    /// 🔑 The group key. Printed verbatim at the start of every report line.
    type Key: Copy + Eq + Hash + Display + Debug + Send + Sync + 'static;

    /// 🏷️ Human name for logs and summaries.
    const DIMENSION: &'static str;

    fn key_of(event: &PlayEvent) -> Self::Key;
}

/// 🌍 Group plays by the listener's country.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCountry;

impl GroupBy for ByCountry {
    type Key = CountryCode;
    const DIMENSION: &'static str = "country";

    #[inline]
    fn key_of(event: &PlayEvent) -> CountryCode {
        event.country_code
    }
}

/// 🎧 Group plays by listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByListener;

impl GroupBy for ByListener {
    type Key = ListenerId;
    const DIMENSION: &'static str = "listener";

    #[inline]
    fn key_of(event: &PlayEvent) -> ListenerId {
        event.listener_id
    }
}

/// 🎵 One leaderboard entry: a song and how many times it got played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongCount {
    pub song_id: SongId,
    pub count: u64,
}

/// 🏆 The top songs of one group, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard<K> {
    pub group: K,
    pub entries: Vec<SongCount>,
}

/// 📊 Running play counts for one grouping dimension.
///
/// Invariant: `count(group, song)` equals the number of recorded events with
/// that group and song. Nothing is ever evicted.
#[derive(Debug)]
pub struct PlayCounts<G: GroupBy> {
    slots: HashMap<G::Key, usize>,
    groups: Vec<(G::Key, HashMap<SongId, u64>)>,
    recorded: u64,
    _dimension: PhantomData<G>,
}

impl<G: GroupBy> Default for PlayCounts<G> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            groups: Vec::new(),
            recorded: 0,
            _dimension: PhantomData,
        }
    }
}

impl<G: GroupBy> PlayCounts<G> {
    pub fn new() -> Self {
        Self::default()
    }

    /// ➕ Count one play.
    pub fn record(&mut self, event: &PlayEvent) {
        let key = G::key_of(event);
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                // -- 🆕 first time we've seen this group. it gets the next seat in line.
                let slot = self.groups.len();
                self.groups.push((key, HashMap::new()));
                self.slots.insert(key, slot);
                slot
            }
        };
        *self.groups[slot].1.entry(event.song_id).or_insert(0) += 1;
        self.recorded += 1;
    }

    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a PlayEvent>) {
        for event in events {
            self.record(event);
        }
    }

    /// 🔍 Current count for one (group, song). Zero if never seen.
    pub fn count(&self, group: &G::Key, song_id: SongId) -> u64 {
        self.slots
            .get(group)
            .and_then(|&slot| self.groups[slot].1.get(&song_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// 📈 Total events recorded, across every group.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// 🏁 Consume the counts and produce one leaderboard per group, in
    /// first-seen group order, each holding at most `size` entries.
    pub fn into_leaderboards(self, size: usize) -> Vec<Leaderboard<G::Key>> {
        self.groups
            .into_iter()
            .map(|(group, songs)| Leaderboard {
                group,
                entries: top_k(songs, size),
            })
            .collect()
    }
}

/// 🥇 The ranking order: more plays first, lower song id breaks ties.
#[inline]
fn rank(a: &SongCount, b: &SongCount) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.song_id.cmp(&b.song_id))
}

/// 🎯 Exact top-K of a song→count table, sorted best first.
///
/// `select_nth_unstable_by` partitions around the K-th best in linear time,
/// so only the winners pay for a sort. Song ids are unique within a table,
/// which makes `rank` a total order and the output deterministic.
pub fn top_k(songs: HashMap<SongId, u64>, size: usize) -> Vec<SongCount> {
    if size == 0 {
        return Vec::new();
    }

    let mut entries: Vec<SongCount> = songs
        .into_iter()
        .map(|(song_id, count)| SongCount { song_id, count })
        .collect();

    if entries.len() > size {
        entries.select_nth_unstable_by(size - 1, rank);
        entries.truncate(size);
    }
    entries.sort_unstable_by(rank);
    entries
}
