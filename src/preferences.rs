use crate::errors::EntryError;
use crate::models::Mood;
use crate::storage::{KeyValueStore, read_json, write_json};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::io;

pub const PREFERENCES_KEY: &str = "micromood-preferences";
pub const ADMIN_SETTINGS_KEY: &str = "micromood-admin-settings";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub color_theme: String,
    pub sound_effects: bool,
    pub animations: bool,
    pub reminder_enabled: bool,
    pub reminder_time: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            color_theme: "pastel".to_string(),
            sound_effects: true,
            animations: true,
            reminder_enabled: false,
            reminder_time: "18:00".to_string(),
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<(), EntryError> {
        if NaiveTime::parse_from_str(&self.reminder_time, "%H:%M").is_err() {
            return Err(EntryError::Invalid(format!(
                "reminder time '{}' must look like HH:MM",
                self.reminder_time
            )));
        }
        if self.color_theme.trim().is_empty() {
            return Err(EntryError::Invalid("color theme is required".into()));
        }
        Ok(())
    }
}

/// Platform switches an admin controls, stored apart from user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    pub auto_suggest_habits: bool,
    pub default_mood: Mood,
    pub show_analytics: bool,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            auto_suggest_habits: true,
            default_mood: Mood::Neutral,
            show_analytics: true,
        }
    }
}

pub fn load_admin_settings(store: &dyn KeyValueStore) -> AdminSettings {
    read_json(store, ADMIN_SETTINGS_KEY).unwrap_or_default()
}

pub fn save_admin_settings(store: &dyn KeyValueStore, settings: &AdminSettings) -> io::Result<()> {
    write_json(store, ADMIN_SETTINGS_KEY, settings)
}

pub fn load(store: &dyn KeyValueStore) -> Preferences {
    read_json(store, PREFERENCES_KEY).unwrap_or_default()
}

pub fn save(store: &dyn KeyValueStore, preferences: &Preferences) -> io::Result<()> {
    write_json(store, PREFERENCES_KEY, preferences)
}
