use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use memchr::memchr2;
use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt},
};
use tracing::trace;

use crate::backends::Source;
use crate::progress::ProgressMetrics;

/// 📂 FileSource: reads the day's log one line at a time and never looks back.
///
/// 🧵 Async, non-blocking. The BufReader wraps a tokio `File`, so memory stays
/// at one buffer plus one line, no matter how chatty the listeners were.
/// 📊 Tracks bytes and lines via `ProgressMetrics` for the humans watching.
pub(crate) struct FileSource {
    path: PathBuf,
    buf_reader: io::BufReader<File>,
    line: Vec<u8>,
    /// The last line ended in `\r`. A `\n` right after it belongs to that line.
    after_cr: bool,
    progress: ProgressMetrics,
}

// 🐛 progress is excluded here. Nobody debugging a FileSource wants a wall of spinner state.
impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource").field("path", &self.path).finish()
    }
}

impl FileSource {
    /// 🚀 Opens the log file and wraps it in a BufReader.
    ///
    /// If the file doesn't exist or can't be read: 💀 this is THE fatal error
    /// of a run. No input, no reports. Better loud than silently empty.
    /// If metadata fails: we assume 0 bytes and the progress bar shrugs.
    pub(crate) async fn new(path: &Path) -> Result<Self> {
        let file_handle = File::open(path).await.context(format!(
            "💀 The listen log '{}' would not open. We knocked. We pleaded. \
            Either it doesn't exist (check the date and the log folder) or the permissions \
            say no. Without it there is nothing to count, so there will be no reports today.",
            path.display()
        ))?;

        // 📏 file size for the progress bar. 0 = unknown, and that's fine.
        let file_size = file_handle.metadata().await.map(|m| m.len()).unwrap_or(0);
        let progress = ProgressMetrics::new(path.display().to_string(), file_size);

        Ok(Self {
            path: path.to_path_buf(),
            buf_reader: io::BufReader::new(file_handle),
            line: Vec::with_capacity(256),
            after_cr: false,
            progress,
        })
    }
}

#[async_trait]
impl Source for FileSource {
    /// 📄 Read the next line, terminator stripped. `None` at EOF.
    ///
    /// Lines end at `\n`, `\r\n`, or a lone `\r`, same as universal newlines.
    /// Raw bytes instead of `read_line`: one line of invalid UTF-8 must not
    /// take the whole run down with it. The parser rejects it like any other
    /// malformed line.
    async fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        self.line.clear();
        let mut bytes_read = 0u64;

        loop {
            let buf = self.buf_reader.fill_buf().await.with_context(|| {
                format!(
                    "💀 Reading '{}' broke halfway through. The disk giveth, the disk taketh away.",
                    self.path.display()
                )
            })?;

            if buf.is_empty() {
                break;
            }

            // -- 🔗 second half of a \r\n that straddled two calls
            if std::mem::take(&mut self.after_cr) && buf[0] == b'\n' {
                self.buf_reader.consume(1);
                bytes_read += 1;
                continue;
            }

            match memchr2(b'\n', b'\r', buf) {
                Some(at) => {
                    self.after_cr = buf[at] == b'\r';
                    self.line.extend_from_slice(&buf[..at]);
                    self.buf_reader.consume(at + 1);
                    bytes_read += at as u64 + 1;
                    self.progress.update(bytes_read, 1);
                    return Ok(Some(self.line.clone()));
                }
                None => {
                    let taken = buf.len();
                    self.line.extend_from_slice(buf);
                    self.buf_reader.consume(taken);
                    bytes_read += taken as u64;
                }
            }
        }

        if self.line.is_empty() {
            // ✅ EOF. The well is dry. Roll the credits.
            trace!("🏁 reached the end of '{}'", self.path.display());
            self.progress.update(bytes_read, 0);
            self.progress.finish();
            return Ok(None);
        }

        // 📄 last line, no terminator. still a line.
        self.progress.update(bytes_read, 1);
        Ok(Some(self.line.clone()))
    }
}
