//! 📂 Previously, on "Things That Could Go Wrong With A File"...
//!
//! The log was closed at midnight. Forty million lines. One of them says
//! `not_a_number|55|FR` and we will never know why. This module doesn't care.
//! It reads lines. It writes lines. The judging happens elsewhere.
//!
//! 🚰 listen-YYYYMMDD.log → BufReader → lines → ... → BufWriter → country_top50YYYYMMDD.txt
//! 💀 Input missing → the whole run fails, loudly, before any report exists
//! 🦆 (mandatory, no notes)

mod file_sink;
mod file_source;

pub(crate) use file_sink::FileSink;
pub(crate) use file_source::FileSource;
