use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backends::Sink;

/// 📦 A sink that never forgets.
///
/// Clone it before handing it to the pipeline, keep the clone, read
/// `received` afterwards. The `Arc` means everyone shares the same Vec.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemorySink {
    pub(crate) received: Arc<Mutex<Vec<String>>>,
    pub(crate) closed: Arc<Mutex<bool>>,
    /// 💥 payloads starting with this prefix fail to send. For testing the sad path.
    fail_prefix: Option<String>,
}

impl InMemorySink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(prefix: impl Into<String>) -> Self {
        Self {
            fail_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    pub(crate) async fn lines(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}

#[async_trait]
impl Sink for InMemorySink {
    async fn send(&mut self, payload: String) -> Result<()> {
        if let Some(prefix) = &self.fail_prefix {
            if payload.starts_with(prefix.as_str()) {
                bail!("💥 the in-memory sink refuses '{prefix}' on principle");
            }
        }
        self.received.lock().await.push(payload);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        *self.closed.lock().await = true;
        Ok(())
    }
}
