//! 📦 Common data structures: the building blocks of hitlist.
//!
//! 🎬 COLD OPEN: INT. STREAMING DATA CENTER, 11:59 PM
//!
//! Somewhere, a listener in France presses play on the same song for the
//! fourteenth time today. The log file grows by one line. It does not judge.
//! It only appends. At midnight the file is closed and this module's structs
//! are born, live for one run, and are forgotten. Like mayflies. With ids.
//!
//! 🦆

use std::fmt;
use std::sync::Arc;

/// 🎵 A song identifier. Always > 0, the parser makes sure of it.
pub type SongId = u64;

/// 🎧 A listener identifier. Also always > 0. Zero listeners is a sad radio station.
pub type ListenerId = u64;

/// 🎯 A `PlayEvent`: one validated listen. One line in, one struct out.
///
/// Built only by [`crate::parser::parse_line`], so every value you hold has
/// already survived validation: positive ids, two-character country code.
/// Immutable once born.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    pub(crate) song_id: SongId,
    pub(crate) listener_id: ListenerId,
    pub(crate) country_code: CountryCode,
}

impl PlayEvent {
    pub fn song_id(&self) -> SongId {
        self.song_id
    }

    pub fn listener_id(&self) -> ListenerId {
        self.listener_id
    }

    pub fn country_code(&self) -> CountryCode {
        self.country_code
    }
}

/// 🌍 Exactly two characters. "FR", "DE", "??". ISO-ness is not our business.
///
/// Two `char`s instead of a `String` so grouping by country costs a copy,
/// not an allocation per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([char; 2]);

impl CountryCode {
    /// 🔧 `None` unless the input is exactly two characters long.
    pub fn new(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Some(Self([first, second])),
            _ => None,
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.0;
        write!(f, "{first}{second}")
    }
}

/// 📦 A batch of validated events, shared read-only between aggregation workers.
///
/// `Arc<[T]>` so both the country worker and the listener worker look at the
/// same allocation. No copies. No fights over who gets the last slice.
pub(crate) type EventBatch = Arc<[PlayEvent]>;
