//! 🔍 Parser: raw log line in, [`PlayEvent`] (or a very specific complaint) out.
//!
//! ```text
//!   "101|55|FR"            ──▶ Ok(PlayEvent { song 101, listener 55, FR })
//!   "not_a_number|55|FR"   ──▶ Err(RejectReason::SongIdNotInteger)
//!   "101|-3|FR"            ──▶ Err(RejectReason::ListenerIdNotPositive)
//!   "102|55|FRA"           ──▶ Err(RejectReason::CountryCodeLength)
//! ```
//!
//! 🧠 Knowledge graph:
//! - Called by the source worker, once per line, in file order.
//! - A rejection is a value, not a panic. The worker logs it and moves on.
//! - Checks run field by field, left to right. First failure wins.
//!
//! ⚠️ We validate shape and range. We do not call the record label to ask
//! whether song 101 exists. Song 101 exists in our hearts. 🦆

use memchr::memchr_iter;
use thiserror::Error;

use crate::common::{CountryCode, PlayEvent};

/// 🔪 The one true field separator: `song_id|listener_id|country_code`.
pub const FIELD_DELIMITER: u8 = b'|';

/// 💀 Why a line didn't make it into the charts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("expected 3 '|'-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("song_id {value:?} is not an integer")]
    SongIdNotInteger { value: String },

    #[error("song_id must be > 0, got {value}")]
    SongIdNotPositive { value: i128 },

    #[error("listener_id {value:?} is not an integer")]
    ListenerIdNotInteger { value: String },

    #[error("listener_id must be > 0, got {value}")]
    ListenerIdNotPositive { value: i128 },

    #[error("country_code {value:?} must be exactly 2 characters, got {length}")]
    CountryCodeLength { value: String, length: usize },

    #[error("line is not valid UTF-8")]
    NotUtf8,
}

/// 🔄 Parse and validate one raw log line.
///
/// The whole line is trimmed first (stray `\r`, trailing spaces). Integer
/// fields tolerate whitespace around the digits. The country code is taken
/// as-is and measured in characters, not bytes.
pub fn parse_line(line: &str) -> Result<PlayEvent, RejectReason> {
    let line = line.trim();

    // -- 🔍 exactly two pipes, found in one memchr pass. their offsets are the split points.
    let mut pipes = memchr_iter(FIELD_DELIMITER, line.as_bytes());
    let (first, second) = match (pipes.next(), pipes.next(), pipes.next()) {
        (Some(first), Some(second), None) => (first, second),
        (a, b, c) => {
            let found = 1 + [a, b, c].iter().flatten().count() + pipes.count();
            return Err(RejectReason::FieldCount { found });
        }
    };
    // -- '|' is ASCII, so both offsets sit on char boundaries
    let song_field = &line[..first];
    let listener_field = &line[first + 1..second];
    let country_field = &line[second + 1..];

    let song_id = match parse_id(song_field) {
        IdField::Positive(id) => id,
        IdField::NotPositive(value) => return Err(RejectReason::SongIdNotPositive { value }),
        IdField::NotInteger => {
            return Err(RejectReason::SongIdNotInteger {
                value: song_field.to_string(),
            });
        }
    };

    let listener_id = match parse_id(listener_field) {
        IdField::Positive(id) => id,
        IdField::NotPositive(value) => {
            return Err(RejectReason::ListenerIdNotPositive { value });
        }
        IdField::NotInteger => {
            return Err(RejectReason::ListenerIdNotInteger {
                value: listener_field.to_string(),
            });
        }
    };

    let Some(country_code) = CountryCode::new(country_field) else {
        return Err(RejectReason::CountryCodeLength {
            value: country_field.to_string(),
            length: country_field.chars().count(),
        });
    };

    Ok(PlayEvent {
        song_id,
        listener_id,
        country_code,
    })
}

enum IdField {
    Positive(u64),
    NotPositive(i128),
    NotInteger,
}

/// 🔢 Ids are `u64`. Parsed wide so the sign is judged before the range.
/// Anything past `u64::MAX` has no id to become and counts as not an integer.
fn parse_id(field: &str) -> IdField {
    match field.trim().parse::<i128>() {
        Ok(value) if value <= 0 => IdField::NotPositive(value),
        Ok(value) => match u64::try_from(value) {
            Ok(id) => IdField::Positive(id),
            Err(_) => IdField::NotInteger,
        },
        Err(_) => IdField::NotInteger,
    }
}
