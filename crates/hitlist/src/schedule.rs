//! ⏰ Schedule: the "run it every night at midnight" loop.
//!
//! Sleep until the next configured wall-clock time, run against the day that
//! just closed, log how it went, go back to sleep. A failed night is logged at
//! `error` and the loop keeps going. Tomorrow is another log file.
//!
//! 🧠 Knowledge graph:
//! - [`next_run_after`] and [`closed_day`] are pure. The loop is the only
//!   thing in this crate that reads the clock.
//! - Times are naive local time. A DST jump can shift one night's run by an
//!   hour. The charts will survive.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Deserialize;
use tracing::{error, info};

use crate::app_config::AppConfig;

const RUN_TIME_FORMAT: &str = "%H:%M";

/// 🕛 When the nightly run fires.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Local wall-clock time, `HH:MM`.
    #[serde(default = "default_run_time")]
    pub run_time: String,
}

fn default_run_time() -> String {
    "00:00".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_time: default_run_time(),
        }
    }
}

impl ScheduleConfig {
    pub fn run_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.run_time, RUN_TIME_FORMAT).context(format!(
            "💀 schedule.run_time '{}' is not a time. Expected HH:MM, like \"00:00\" or \"03:30\".",
            self.run_time
        ))
    }
}

/// ⏭️ The first moment strictly after `now` whose clock reads `at`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// 📅 The day whose log is closed at `run_at`: the day before.
pub fn closed_day(run_at: NaiveDateTime) -> NaiveDate {
    let date = run_at.date();
    date.pred_opt().unwrap_or(date)
}

/// 🔄 Run forever, once a day. Only returns if the configuration is unusable.
pub async fn run_daily(app_config: AppConfig) -> Result<()> {
    let at = app_config.schedule.run_time()?;
    info!(run_time = %at, "⏰ scheduler armed, waiting for the next run");

    loop {
        let now = Local::now().naive_local();
        let next = next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next_run = %next, "💤 sleeping until the next run");
        tokio::time::sleep(wait).await;

        let day = closed_day(next);
        let paths = app_config.paths.resolve(day);
        match crate::run(&paths, &app_config.runtime).await {
            Ok(summary) => info!(
                %day,
                lines_read = summary.lines_read,
                lines_rejected = summary.lines_rejected,
                "✅ nightly run complete"
            ),
            Err(err) => {
                error!(%day, "💀 nightly run failed: {err:#}. Trying again tomorrow.");
            }
        }
    }
}
