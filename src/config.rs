use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Hotkey value the editor stores for an unassigned recorder.
pub const UNSET_HOTKEY: &str = "Not Set";

/// User settings relevant to macro execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub hotkeys: HotkeySettings,
}

/// Timing knobs of the execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Longest single wait before cancellation is checked again.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pause between repetitions of a continuously looping start node.
    #[serde(default = "default_repeat_pause_ms")]
    pub repeat_pause_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotkeySettings {
    #[serde(default, alias = "emergencyStop")]
    pub emergency_stop: Option<String>,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_repeat_pause_ms() -> u64 {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            repeat_pause_ms: default_repeat_pause_ms(),
        }
    }
}

impl EngineConfig {
    /// Polling increment, never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn repeat_pause(&self) -> Duration {
        Duration::from_millis(self.repeat_pause_ms)
    }
}

impl HotkeySettings {
    /// The emergency-stop hotkey, if one is actually assigned.
    pub fn emergency_stop(&self) -> Option<&str> {
        self.emergency_stop
            .as_deref()
            .map(str::trim)
            .filter(|hotkey| !hotkey.is_empty() && *hotkey != UNSET_HOTKEY)
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads settings from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}
