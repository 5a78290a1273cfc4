use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::{
    fs::{File, OpenOptions},
    io::{self, AsyncWriteExt},
};
use tracing::trace;

use crate::backends::Sink;

/// 🚰 FileSink: a BufWriter around a tokio `File`. It writes what you give it.
///
/// ⚠️ Opening never touches existing content; [`FileSink::truncate`] does.
/// Both reports get opened first and truncated second, so a report folder that
/// refuses one file leaves yesterday's other report exactly as it was.
#[derive(Debug)]
pub(crate) struct FileSink {
    path: PathBuf,
    file_buf: io::BufWriter<File>,
}

impl FileSink {
    /// 🚀 Opens the report file for writing, creating it if needed.
    ///
    /// A missing output folder is an environment problem, not ours. We say so
    /// and fail the run.
    pub(crate) async fn open(path: &Path) -> Result<Self> {
        let file_handle = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await
            .context(format!(
                "💀 The report file '{}' could not be conjured into existence. \
                We stared at the path. The path stared back. \
                One of us was wrong about whether the output folder existed.",
                path.display()
            ))?;
        Ok(Self {
            path: path.to_path_buf(),
            file_buf: io::BufWriter::new(file_handle),
        })
    }

    /// 🗑️ Drop whatever the last run left behind. Call before the first `send`.
    pub(crate) async fn truncate(&mut self) -> Result<()> {
        self.file_buf.get_ref().set_len(0).await.context(format!(
            "💀 Could not clear the old contents of '{}'",
            self.path.display()
        ))
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn send(&mut self, payload: String) -> Result<()> {
        self.file_buf
            .write_all(payload.as_bytes())
            .await
            .context(format!("💀 write to '{}' failed", self.path.display()))
    }

    /// 🗑️ Flush the BufWriter. async Drop isn't a thing, so this is how the
    /// last buffered lines reach the disk.
    async fn close(&mut self) -> Result<()> {
        trace!("🎬 final flush of '{}'", self.path.display());
        self.file_buf.flush().await.context(format!(
            "💀 Error flushing '{}'. The lines were SO CLOSE to the disk.",
            self.path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn the_one_where_yesterdays_report_gets_overwritten() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "stale stale stale\n")?;

        let mut sink = FileSink::open(&path).await?;
        sink.truncate().await?;
        sink.send("FR|1:2\n".to_string()).await?;
        sink.close().await?;

        assert_eq!(std::fs::read_to_string(&path)?, "FR|1:2\n");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_output_folder_is_imaginary() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nope").join("report.txt");
        assert!(FileSink::open(&path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_opening_alone_keeps_yesterday_intact() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "DE|9:9\n")?;

        let sink = FileSink::open(&path).await?;
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path)?, "DE|9:9\n");
        Ok(())
    }
}
