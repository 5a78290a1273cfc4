//! 🚀 hitlist-cli: the front door, the bouncer, the late-night DJ of hitlist.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 Thin wrapper: parse args, set up logging, load config, then either run
//! one day right now or wait for midnight forever. The real work lives in the
//! library. Like a manager. 🦆

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use tracing::error;
use tracing_subscriber::EnvFilter;

use hitlist::RunSummary;

// 🔧 the ol' reliable. Used only if it's actually there.
const DEFAULT_CONFIG_FILE: &str = "hitlist.toml";

/// 🎧 Build the daily country and listener top-50 charts from a listen log.
#[derive(Debug, Parser)]
#[command(name = "hitlist", version, about)]
struct Args {
    /// Stay resident and run every day at the configured time.
    #[arg(long)]
    auto: bool,

    /// TOML configuration file. Defaults to ./hitlist.toml when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Process this day instead of yesterday (one-shot mode only).
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_date, conflicts_with = "auto")]
    date: Option<NaiveDate>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|err| format!("expected YYYYMMDD, like 20240307 ({err})"))
}

/// 🔒 An explicit `--config` must exist. The default one is optional.
fn config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            let exists = path.try_exists().context(format!(
                "💀 Couldn't check whether the configuration file exists. Was checking here: '{}'",
                path.display()
            ))?;
            anyhow::ensure!(
                exists,
                "💀 Configuration file '{}' not found. Double check the path, or use an absolute \
                 one to be absolutely certain.",
                path.display()
            );
            Ok(Some(path.to_path_buf()))
        }
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            Ok(default.is_file().then_some(default))
        }
    }
}

fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.pred_opt().unwrap_or(today)
}

/// 📊 The end-of-run table. For humans. Logs are for machines.
fn summary_table(date: NaiveDate, summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["🎧 hitlist", "value"]);
    table.add_row(vec![Cell::new("day"), Cell::new(date.format("%Y-%m-%d"))]);
    table.add_row(vec![Cell::new("lines read"), Cell::new(summary.lines_read)]);
    table.add_row(vec![Cell::new("events accepted"), Cell::new(summary.events_accepted)]);
    table.add_row(vec![Cell::new("lines rejected"), Cell::new(summary.lines_rejected)]);
    for report in [&summary.country, &summary.listener] {
        table.add_row(vec![
            Cell::new(format!("{} groups written", report.dimension)),
            Cell::new(report.lines_written),
        ]);
        if report.groups_skipped > 0 {
            table.add_row(vec![
                Cell::new(format!("⚠️ {} groups skipped", report.dimension)),
                Cell::new(report.groups_skipped),
            ]);
        }
    }
    table
}

async fn run(args: Args) -> Result<()> {
    let config_file = config_path(args.config.as_deref())?;
    let app_config = hitlist::app_config::load_config(config_file.as_deref())
        .context("💀 In hitlist-cli, main, we couldn't load the configuration. Take a look at the file and the HITLIST_* variables.")?;

    if args.auto {
        return hitlist::schedule::run_daily(app_config).await;
    }

    let date = args.date.unwrap_or_else(yesterday);
    let paths = app_config.paths.resolve(date);
    let summary = hitlist::run(&paths, &app_config.runtime).await?;
    println!("{}", summary_table(date, &summary));
    Ok(())
}

/// 🚀 main(): init tracing, parse args, hand off, cry on error.
#[tokio::main]
async fn main() -> Result<()> {
    // 📡 RUST_LOG wins. Otherwise info, because a nightly job should say something.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if let Err(err) = run(args).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }
        // 🗑️ Exit with prejudice. Cron will notice.
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_date_flag_is_parsed() -> Result<()> {
        let args = Args::try_parse_from(["hitlist", "--date", "20240307"])?;
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert!(!args.auto);
        Ok(())
    }

    #[test]
    fn the_one_where_a_bad_date_is_refused() {
        assert!(Args::try_parse_from(["hitlist", "--date", "2024-03-07"]).is_err());
    }

    #[test]
    fn the_one_where_auto_and_date_dont_mix() {
        assert!(Args::try_parse_from(["hitlist", "--auto", "--date", "20240307"]).is_err());
    }

    #[test]
    fn the_one_where_a_named_config_must_exist() {
        assert!(config_path(Some(Path::new("/definitely/not/here/hitlist.toml"))).is_err());
    }
}
