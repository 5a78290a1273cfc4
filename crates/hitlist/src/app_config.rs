//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." (every developer at 3am) 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.

use anyhow::{Context, ensure};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::paths::PathsConfig;
use crate::schedule::ScheduleConfig;
use crate::supervisors::config::RuntimeConfig;

/// 📦 One struct to rule them all. Every section has defaults, so an empty
/// environment and no file is still a perfectly good configuration.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// ✅ Catch the values that would deserialize fine and then ruin the night.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.runtime.leaderboard_size >= 1,
            "💀 runtime.leaderboard_size must be at least 1. A top-0 chart is just silence."
        );
        ensure!(
            self.runtime.batch_size >= 1,
            "💀 runtime.batch_size must be at least 1"
        );
        ensure!(
            self.runtime.queue_capacity >= 1,
            "💀 runtime.queue_capacity must be at least 1, a zero-sized queue holds nothing forever"
        );
        self.schedule.run_time()?;
        Ok(())
    }
}

/// 🚀 Load the config from `HITLIST_*` env vars and an optional TOML file.
///
/// 📐 DESIGN NOTE:
///   - `config_file_name` None → env vars only.
///   - `config_file_name` Some → env vars + TOML, merged. TOML wins on conflicts.
///   - Nested keys use a double underscore: `HITLIST_RUNTIME__BATCH_SIZE=5000`.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("HITLIST_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (HITLIST_*). \
             The file exists in our hearts, but apparently not in valid TOML.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (HITLIST_*). \
                 No file was provided, this one's all on the environment. Classic."
            .to_string(),
    };

    let app_config: AppConfig = config.extract().context(context_msg)?;
    app_config.validate()?;
    Ok(app_config)
}
