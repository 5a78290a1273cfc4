//! 🗂️ Paths: where today's log lives and where tonight's reports go.
//!
//! The core never looks at a clock. Somebody hands it a date, this module turns
//! the date into three paths, and [`crate::run`] takes it from there.
//!
//! ```text
//!   2024-03-07 ──▶ logs/listen-20240307.log
//!              ──▶ output/country_top5020240307.txt
//!              ──▶ output/user_top5020240307.txt
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

/// 📂 Folder layout for inputs and outputs.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    #[serde(default = "default_log_folder")]
    pub log_folder: PathBuf,
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,
}

fn default_log_folder() -> PathBuf {
    PathBuf::from("logs")
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("output")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_folder: default_log_folder(),
            output_folder: default_output_folder(),
        }
    }
}

impl PathsConfig {
    /// 📅 Build the date-stamped paths for one day's run.
    pub fn resolve(&self, date: NaiveDate) -> RunPaths {
        let stamp = date.format("%Y%m%d");
        RunPaths {
            input: self.log_folder.join(format!("listen-{stamp}.log")),
            country_report: self.output_folder.join(format!("country_top50{stamp}.txt")),
            listener_report: self.output_folder.join(format!("user_top50{stamp}.txt")),
        }
    }
}

/// 🎯 The explicit inputs and outputs of exactly one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub country_report: PathBuf,
    pub listener_report: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn the_one_where_a_date_becomes_three_paths() {
        let paths = PathsConfig::default().resolve(NaiveDate::from_ymd_opt(2024, 3, 7).expect("valid date"));
        assert_eq!(paths.input, Path::new("logs/listen-20240307.log"));
        assert_eq!(paths.country_report, Path::new("output/country_top5020240307.txt"));
        assert_eq!(paths.listener_report, Path::new("output/user_top5020240307.txt"));
    }

    #[test]
    fn the_one_where_custom_folders_are_respected() {
        let config = PathsConfig {
            log_folder: PathBuf::from("/var/log/streams"),
            output_folder: PathBuf::from("/srv/charts"),
        };
        let paths = config.resolve(NaiveDate::from_ymd_opt(1999, 12, 31).expect("valid date"));
        assert_eq!(paths.input, Path::new("/var/log/streams/listen-19991231.log"));
        assert_eq!(paths.listener_report, Path::new("/srv/charts/user_top5019991231.txt"));
    }
}
