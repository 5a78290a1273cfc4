//! 🔌 Backends: where the real I/O happens.
//!
//! 🚰 Source backends pour raw log lines, Sink backends slurp up report lines.
//! Everything in between (parsing, counting, ranking) never touches a file handle.
//!
//! 🎭 Two flavors of each: the real file on disk, and an in-memory stand-in for
//! tests that would rather not litter `/tmp`. 🦆

mod sink;
mod source;

pub(crate) mod file;
#[cfg(test)]
pub(crate) mod in_mem;

pub(crate) use sink::{Sink, SinkBackend};
pub(crate) use source::{Source, SourceBackend};
