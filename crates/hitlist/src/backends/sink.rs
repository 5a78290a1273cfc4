use anyhow::Result;
use async_trait::async_trait;

use crate::backends::file;
#[cfg(test)]
use crate::backends::in_mem;

/// 🕳️ A sink for fully rendered report lines. Pure I/O, zero formatting.
///
/// # Contract 📜
/// - `send` writes one payload as-is. A failed send loses that payload only.
/// - `close` flushes and finalizes. MUST be called. Skipping it is a bug.
/// - Ancient proverb: "He who formats inside the Sink, debugs in production."
#[async_trait]
pub(crate) trait Sink: std::fmt::Debug + Send {
    async fn send(&mut self, payload: String) -> Result<()>;
    async fn close(&mut self) -> Result<()>;
}

/// 🎭 Mirrors `SourceBackend` on the other end of the pipeline.
#[derive(Debug)]
pub(crate) enum SinkBackend {
    #[cfg(test)]
    InMemory(in_mem::InMemorySink),
    File(file::FileSink),
}

#[async_trait]
impl Sink for SinkBackend {
    async fn send(&mut self, payload: String) -> Result<()> {
        match self {
            #[cfg(test)]
            SinkBackend::InMemory(sink) => sink.send(payload).await,
            SinkBackend::File(sink) => sink.send(payload).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            #[cfg(test)]
            SinkBackend::InMemory(sink) => sink.close().await,
            SinkBackend::File(sink) => sink.close().await,
        }
    }
}
