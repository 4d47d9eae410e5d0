// Display shell - Keyboard and activity handling in front of the controller
use crate::application::rotation::DisplayCommand;
use crate::domain::settings::DisplaySettings;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Navigation chrome stays visible this long after the last input.
pub const NAVIGATION_IDLE_TIMEOUT: Duration = Duration::from_secs(3);

/// Where keyboard focus was when the key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    #[default]
    Document,
    TextInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyEvent {
    /// DOM `KeyboardEvent.key` value, e.g. `ArrowRight`, ` `, `r`.
    pub key: String,
    #[serde(default)]
    pub focus: Focus,
}

#[derive(Debug)]
pub struct DisplayShell {
    shortcuts_enabled: bool,
    show_navigation: bool,
    last_activity: Option<Instant>,
}

impl DisplayShell {
    pub fn new(settings: &DisplaySettings) -> Self {
        Self {
            shortcuts_enabled: settings.enable_keyboard_shortcuts,
            show_navigation: settings.show_navigation,
            last_activity: None,
        }
    }

    pub fn apply_settings(&mut self, settings: &DisplaySettings) {
        self.shortcuts_enabled = settings.enable_keyboard_shortcuts;
        self.show_navigation = settings.show_navigation;
    }

    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = Some(now);
    }

    /// When the navigation chrome hides again, if it is showing at all.
    pub fn navigation_deadline(&self) -> Option<Instant> {
        if !self.show_navigation {
            return None;
        }
        self.last_activity.map(|t| t + NAVIGATION_IDLE_TIMEOUT)
    }

    pub fn navigation_visible(&self, now: Instant) -> bool {
        self.navigation_deadline().is_some_and(|until| now < until)
    }

    /// Translate a key press into a controller command. Keys typed into a
    /// text field never reach the controller.
    pub fn handle_key(&mut self, event: &KeyEvent, now: Instant) -> Option<DisplayCommand> {
        self.record_activity(now);

        if !self.shortcuts_enabled || event.focus == Focus::TextInput {
            return None;
        }

        let command = match event.key.as_str() {
            "ArrowRight" | "PageDown" => DisplayCommand::Next,
            "ArrowLeft" | "PageUp" => DisplayCommand::Previous,
            " " | "Spacebar" | "p" | "P" => DisplayCommand::TogglePause,
            "r" | "R" | "F5" => DisplayCommand::Refresh,
            "f" | "F" | "F11" => DisplayCommand::ToggleFullscreen,
            "Escape" => DisplayCommand::ExitFullscreen,
            _ => return None,
        };
        tracing::debug!("Key {:?} -> {:?}", event.key, command);
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: &str) -> KeyEvent {
        KeyEvent {
            key: key.to_string(),
            focus: Focus::Document,
        }
    }

    #[test]
    fn test_bindings() {
        let now = Instant::now();
        let mut shell = DisplayShell::new(&DisplaySettings::default());

        assert_eq!(shell.handle_key(&key("ArrowRight"), now), Some(DisplayCommand::Next));
        assert_eq!(shell.handle_key(&key("ArrowLeft"), now), Some(DisplayCommand::Previous));
        assert_eq!(shell.handle_key(&key(" "), now), Some(DisplayCommand::TogglePause));
        assert_eq!(shell.handle_key(&key("r"), now), Some(DisplayCommand::Refresh));
        assert_eq!(shell.handle_key(&key("F11"), now), Some(DisplayCommand::ToggleFullscreen));
        assert_eq!(shell.handle_key(&key("Escape"), now), Some(DisplayCommand::ExitFullscreen));
        assert_eq!(shell.handle_key(&key("x"), now), None);
    }

    #[test]
    fn test_text_input_focus_suppresses_shortcuts() {
        let now = Instant::now();
        let mut shell = DisplayShell::new(&DisplaySettings::default());
        let typing = KeyEvent {
            key: "r".to_string(),
            focus: Focus::TextInput,
        };

        assert_eq!(shell.handle_key(&typing, now), None);
    }

    #[test]
    fn test_disabled_shortcuts() {
        let now = Instant::now();
        let settings = DisplaySettings {
            enable_keyboard_shortcuts: false,
            ..DisplaySettings::default()
        };
        let mut shell = DisplayShell::new(&settings);

        assert_eq!(shell.handle_key(&key("ArrowRight"), now), None);
    }

    #[test]
    fn test_navigation_hides_after_idle() {
        let now = Instant::now();
        let mut shell = DisplayShell::new(&DisplaySettings::default());
        assert!(!shell.navigation_visible(now));

        shell.record_activity(now);
        assert!(shell.navigation_visible(now + Duration::from_secs(2)));
        assert!(!shell.navigation_visible(now + Duration::from_secs(3)));

        let hidden = DisplaySettings {
            show_navigation: false,
            ..DisplaySettings::default()
        };
        shell.apply_settings(&hidden);
        shell.record_activity(now);
        assert!(!shell.navigation_visible(now));
    }
}
