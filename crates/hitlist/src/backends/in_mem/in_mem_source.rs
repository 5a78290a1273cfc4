use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;

use crate::backends::Source;

/// 📦 Replays a fixed list of lines, in order, exactly once.
#[derive(Debug, Default)]
pub(crate) struct InMemorySource {
    lines: VecDeque<Vec<u8>>,
}

impl InMemorySource {
    pub(crate) fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Source for InMemorySource {
    async fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.lines.pop_front())
    }
}
