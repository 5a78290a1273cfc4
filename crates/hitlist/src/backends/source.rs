use anyhow::Result;
use async_trait::async_trait;

use crate::backends::file;
#[cfg(test)]
use crate::backends::in_mem;

/// 🚰 A source of raw log lines, read forward, exactly once.
///
/// # Contract 📜
/// - `next_line` returns one line per call with its `\n` / `\r\n` terminator removed.
/// - Lines are raw bytes. UTF-8 is the parser's problem, not the faucet's.
/// - `None` = EOF. No rewinding. Tomorrow's run re-opens tomorrow's file.
/// - `Err(...)` means the read itself broke, which fails the run.
#[async_trait]
pub(crate) trait Source: std::fmt::Debug + Send {
    async fn next_line(&mut self) -> Result<Option<Vec<u8>>>;
}

/// 🎭 The many faces of a Source. The supervisor doesn't care which one it got.
#[derive(Debug)]
pub(crate) enum SourceBackend {
    #[cfg(test)]
    InMemory(in_mem::InMemorySource),
    File(file::FileSource),
}

#[async_trait]
impl Source for SourceBackend {
    async fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        match self {
            #[cfg(test)]
            SourceBackend::InMemory(source) => source.next_line().await,
            SourceBackend::File(source) => source.next_line().await,
        }
    }
}
