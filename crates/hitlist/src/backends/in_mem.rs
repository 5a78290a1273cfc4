//! # Previously, on hitlist...
//!
//! 🎬 Not every test deserves a real file. Some tests just want to hand the
//! pipeline five lines and read back two. This module is for them.
//!
//! [`InMemorySource`] replays a fixed list of lines, once. [`InMemorySink`]
//! hoards whatever it receives behind an `Arc<Mutex<...>>` so the test can peek
//! after the pipeline is done with it. It can also be told to fail on purpose,
//! because the skip-a-broken-group path needs exercise too.
//!
//! ⚠️ This is NOT for production. This is for tests. 🦆

mod in_mem_sink;
mod in_mem_source;

pub(crate) use in_mem_sink::InMemorySink;
pub(crate) use in_mem_source::InMemorySource;
