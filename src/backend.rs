use crate::error::ActionError;
use itertools::Itertools;
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Mouse buttons the engine can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parses a button name case-insensitively; anything unknown is `Left`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "right" => MouseButton::Right,
            "middle" => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        };
        write!(f, "{}", name)
    }
}

/// The externally-effectful operations a macro can perform.
///
/// Implementations drive real OS input (or record calls in tests). The engine
/// calls `sleep` only with short increments, never with a full delay, so it
/// can observe cancellation in between. An `Err` from any method is fatal for
/// the run that issued it.
pub trait ActionBackend: Send + Sync {
    fn click(&self, button: MouseButton, double_click: bool) -> Result<(), ActionError>;

    fn move_to(&self, x: i32, y: i32, duration_seconds: f64) -> Result<(), ActionError>;

    fn press_key(&self, name: &str) -> Result<(), ActionError>;

    fn press_combo(&self, names: &[String]) -> Result<(), ActionError>;

    fn type_text(&self, text: &str, per_char_delay_seconds: f64) -> Result<(), ActionError>;

    fn sleep(&self, seconds: f64) -> Result<(), ActionError>;
}

/// A backend that only logs the actions it is asked to perform.
///
/// Sleeps are real, so timing and cancellation behave as they would against
/// an OS backend.
#[derive(Debug, Clone, Default)]
pub struct DryRunBackend;

impl ActionBackend for DryRunBackend {
    fn click(&self, button: MouseButton, double_click: bool) -> Result<(), ActionError> {
        info!(%button, double_click, "click");
        Ok(())
    }

    fn move_to(&self, x: i32, y: i32, duration_seconds: f64) -> Result<(), ActionError> {
        info!(x, y, duration_seconds, "move mouse");
        Ok(())
    }

    fn press_key(&self, name: &str) -> Result<(), ActionError> {
        info!(key = name, "press key");
        Ok(())
    }

    fn press_combo(&self, names: &[String]) -> Result<(), ActionError> {
        info!(combo = %names.iter().join("+"), "press key combination");
        Ok(())
    }

    fn type_text(&self, text: &str, per_char_delay_seconds: f64) -> Result<(), ActionError> {
        info!(chars = text.chars().count(), per_char_delay_seconds, "type text");
        Ok(())
    }

    fn sleep(&self, seconds: f64) -> Result<(), ActionError> {
        if let Ok(duration) = Duration::try_from_secs_f64(seconds) {
            std::thread::sleep(duration);
        }
        Ok(())
    }
}
