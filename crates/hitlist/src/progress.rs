//! 📊 progress.rs: "Are we there yet?" Every batch job, every night, forever.
//!
//! 🚀 A progress bar over the bytes of the day's log, with a running line count.
//! indicatif hides itself when stderr isn't a terminal, so cron logs stay clean.
//!
//! ⚠️ Watching this progress bar will not make it go faster. We've tried.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

// -- 📏 one mebibyte. not a megabyte, pedants. there's a difference and I will die on this hill.
const MIB: u64 = 1024 * 1024;

// -- 🔄 redrawing on every single line would cost more than reading it
const REDRAW_EVERY_LINES: u64 = 64 * 1024;

/// 📦 Bytes, scaled to something a human can read at 00:03.
fn format_bytes(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= 1024 {
        format!("{:.2} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}

/// 🔢 "1000000" → "1,000,000". You're welcome, eyes.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// 📊 Tracks how much of the log we've chewed through.
pub(crate) struct ProgressMetrics {
    source_name: String,
    total_bytes: u64,
    total_lines: u64,
    progress_bar: ProgressBar,
    start_time: Instant,
}

impl std::fmt::Debug for ProgressMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -- 🎭 ProgressBar is a diva and doesn't derive Debug
        f.debug_struct("ProgressMetrics")
            .field("source_name", &self.source_name)
            .field("total_bytes", &self.total_bytes)
            .field("total_lines", &self.total_lines)
            .finish()
    }
}

impl ProgressMetrics {
    /// 🚀 `total_size` in bytes; 0 means "no idea", and the bar just spins along.
    pub(crate) fn new(source_name: String, total_size: u64) -> Self {
        let progress_bar = ProgressBar::new(total_size);
        // -- 🎨 a bad template just means the default look. not worth failing a run over.
        if let Ok(style) = ProgressStyle::with_template("{msg}\n| [{bar:40.cyan/blue}] {percent}%") {
            progress_bar.set_style(style.progress_chars("=>-"));
        }
        progress_bar.set_message(format!("🎧 reading {source_name}"));

        Self {
            source_name,
            total_bytes: 0,
            total_lines: 0,
            progress_bar,
            start_time: Instant::now(),
        }
    }

    pub(crate) fn update(&mut self, bytes: u64, lines: u64) {
        self.total_bytes += bytes;
        self.total_lines += lines;
        if self.total_lines % REDRAW_EVERY_LINES < lines {
            self.redraw();
        }
    }

    /// 🏁 Final redraw and goodbye. Safe to call more than once.
    pub(crate) fn finish(&mut self) {
        if self.progress_bar.is_finished() {
            return;
        }
        self.redraw();
        self.progress_bar.finish();
    }

    fn redraw(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let lines_per_sec = if elapsed > 0.0 {
            self.total_lines as f64 / elapsed
        } else {
            0.0
        };
        self.progress_bar.set_position(self.total_bytes);
        self.progress_bar.set_message(format!(
            "🎧 {} | {} lines | {} | {:.0} lines/s",
            self.source_name,
            format_number(self.total_lines),
            format_bytes(self.total_bytes),
            lines_per_sec,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_big_numbers_get_commas() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(40_000_000), "40,000,000");
    }

    #[test]
    fn the_one_where_bytes_pick_a_sensible_unit() {
        assert_eq!(format_bytes(12), "12 bytes");
        assert_eq!(format_bytes(2048), "2.00 KiB");
        assert_eq!(format_bytes(3 * MIB), "3.00 MiB");
    }

    #[test]
    fn the_one_where_finishing_twice_is_harmless() {
        let mut metrics = ProgressMetrics::new("listen-test.log".into(), 10);
        metrics.update(10, 1);
        metrics.finish();
        metrics.finish();
        assert_eq!(metrics.total_lines, 1);
    }
}
