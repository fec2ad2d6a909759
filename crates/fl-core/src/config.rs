// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves key bindings and default-layout settings from TOML files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::Orientation;

/// Named modifier keys a binding can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
    /// Command on macOS, the Windows key elsewhere
    Meta,
}

impl Modifier {
    pub fn all() -> &'static [Modifier] {
        &[Modifier::Shift, Modifier::Ctrl, Modifier::Alt, Modifier::Meta]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Modifier::Shift => "shift",
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Meta => "meta",
        }
    }

    /// Parse a modifier name, accepting the common platform spellings
    pub fn from_label(label: &str) -> Option<Modifier> {
        match label.to_ascii_lowercase().as_str() {
            "shift" => Some(Modifier::Shift),
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "meta" | "cmd" | "command" | "super" => Some(Modifier::Meta),
            _ => None,
        }
    }

    /// Physical key codes that produce this modifier
    pub fn key_codes(&self) -> &'static [&'static str] {
        match self {
            Modifier::Shift => &["ShiftLeft", "ShiftRight"],
            Modifier::Ctrl => &["ControlLeft", "ControlRight"],
            Modifier::Alt => &["AltLeft", "AltRight"],
            Modifier::Meta => &["MetaLeft", "MetaRight"],
        }
    }
}

/// What a logical action is bound to.
///
/// Serialized as a single string: `"disabled"`, a modifier name such as
/// `"alt"`, or a physical key code such as `"KeyZ"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Trigger {
    #[default]
    Disabled,
    Modifier(Modifier),
    Key(String),
}

impl Trigger {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Trigger::Disabled)
    }
}

impl TryFrom<String> for Trigger {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidTrigger(value));
        }
        if trimmed.eq_ignore_ascii_case("disabled") {
            return Ok(Trigger::Disabled);
        }
        if let Some(modifier) = Modifier::from_label(trimmed) {
            return Ok(Trigger::Modifier(modifier));
        }
        Ok(Trigger::Key(trimmed.to_string()))
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        trigger.to_string()
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Disabled => f.write_str("disabled"),
            Trigger::Modifier(m) => f.write_str(m.label()),
            Trigger::Key(code) => f.write_str(code),
        }
    }
}

/// Modifier bindings for folder-explorer actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    /// Click a folder while held to save the current layout into it
    pub save: Trigger,
    /// Click a folder while held to restore its saved layout
    pub open_saved: Trigger,
    /// Click a folder while held to open its files in the default layout
    pub open_default: Trigger,
    /// Hold to show the left sidebar, release to hide it again
    pub sidebar_hold: Trigger,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            save: Trigger::Modifier(Modifier::Alt),
            open_saved: Trigger::Modifier(Modifier::Ctrl),
            open_default: Trigger::Modifier(Modifier::Shift),
            sidebar_hold: Trigger::Disabled,
        }
    }
}

impl Bindings {
    /// Pairs of actions bound to the same trigger. Disabled bindings never overlap.
    pub fn overlaps(&self) -> Vec<(&'static str, &'static str)> {
        let named = [
            ("save", &self.save),
            ("open_saved", &self.open_saved),
            ("open_default", &self.open_default),
            ("sidebar_hold", &self.sidebar_hold),
        ];
        let mut out = Vec::new();
        for (i, (a, ta)) in named.iter().enumerate() {
            for (b, tb) in &named[i + 1..] {
                if !ta.is_disabled() && ta == tb {
                    out.push((*a, *b));
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key bindings for explorer actions
    pub bindings: Bindings,

    /// Folders with fewer files than this open one pane per file;
    /// larger folders open as tabs in a single pane
    pub split_threshold: u32,

    /// Direction new panes are split in when opening the default layout
    pub split_direction: Orientation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bindings: Bindings::default(),
            split_threshold: 5,
            split_direction: Orientation::Vertical,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid key binding: {0:?}")]
    InvalidTrigger(String),

    #[error("Split threshold must be at least 1, got {0}")]
    InvalidThreshold(u32),
}

impl Settings {
    /// Get the default config file path (~/.config/folder-layout/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("folder-layout").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split_threshold == 0 {
            return Err(ConfigError::InvalidThreshold(self.split_threshold));
        }
        Ok(())
    }

    /// Load settings from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default path, or return defaults if missing or invalid
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        self.validate()?;
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save settings to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}
