//! Running replayed sessions from files.

use crate::{
    config::SessionConfig,
    replay::{self, ReplayScript, ReplaySummary},
};
use anyhow::Result;
use planedrop_log::info;
use std::path::Path;

/// Replays the script at `script_path` on a headless session configured
/// from the RON file at `config_path`, or with the default configuration if
/// no path is given.
pub fn run_replay_from_files(
    config_path: Option<&Path>,
    script_path: &Path,
) -> Result<ReplaySummary> {
    let config = match config_path {
        Some(config_path) => SessionConfig::from_ron_file(config_path)?,
        None => SessionConfig::default(),
    };
    let script = ReplayScript::from_ron_file(script_path)?;

    info!(
        "Replaying {} steps from {}",
        script.steps.len(),
        script_path.display()
    );

    replay::run_replay(config, &script)
}

#[cfg(feature = "cli")]
pub fn init_logging() -> Result<()> {
    env_logger::init();
    Ok(())
}
