use std::{ops::Not, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ClockError, ClockResult},
    layout::MAX_ALARMS,
};

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Not for Theme {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub alarm_count: u8,
    /// with snooze off the snooze button is hidden and only dismiss is left
    pub snooze: bool,
    pub snooze_minutes: u32,
    /// with persistence off alarms are reset every start
    pub persist: bool,
    pub sound: Option<PathBuf>,
    pub time_format: String,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alarm_count: 3,
            snooze: true,
            snooze_minutes: 10,
            persist: true,
            sound: None,
            time_format: "%I:%M:%S".to_string(),
            theme: Theme::Dark,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// reads the settings, anything missing or unreadable falls back to the defaults
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let settings = match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str::<Self>(&contents).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        }
        .and_then(|settings| settings.validate().map(|()| settings).map_err(|e| e.to_string()));
        settings.unwrap_or_else(|e| {
            log::warn!("couldn't load {}: {e}, using default settings", path.display());
            Self::default()
        })
    }

    /// # Errors
    /// if the settings can't be serialized or written
    pub fn save(&self, path: PathBuf) -> anyhow::Result<()> {
        let settings = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, settings)?;
        log::info!("wrote settings to {}", path.display());
        Ok(())
    }

    /// # Errors
    /// [`ClockError::InvalidInput`] for an alarm count the screen can't show
    /// or a zero minute snooze
    pub fn validate(&self) -> ClockResult<()> {
        if !(1..=MAX_ALARMS).contains(&self.alarm_count) {
            return Err(ClockError::InvalidInput(format!(
                "alarm_count must be between 1 and {MAX_ALARMS}, got {}",
                self.alarm_count
            )));
        }
        if self.snooze_minutes == 0 {
            return Err(ClockError::InvalidInput(
                "snooze_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `None` when snoozing is turned off
    #[must_use]
    pub fn snooze_duration(&self) -> Option<chrono::Duration> {
        self.snooze
            .then(|| chrono::Duration::minutes(i64::from(self.snooze_minutes)))
    }

    #[must_use]
    pub fn sound_path(&self) -> PathBuf {
        self.sound
            .clone()
            .unwrap_or_else(|| Self::sounds_path().join("alarm.wav"))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("", "", "snooze_clock")
    }

    // falls back to the working directory on systems without a home directory
    fn dir_or_cwd(dir: impl FnOnce(&directories::ProjectDirs) -> PathBuf) -> PathBuf {
        Self::project_dirs().map_or_else(|| PathBuf::from("."), |dirs| dir(&dirs))
    }

    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::dir_or_cwd(|dirs| dirs.config_dir().to_path_buf()).join("config.toml")
    }

    #[must_use]
    pub fn alarms_path() -> PathBuf {
        Self::dir_or_cwd(|dirs| dirs.data_dir().to_path_buf()).join("alarms.toml")
    }

    #[must_use]
    pub fn sounds_path() -> PathBuf {
        Self::dir_or_cwd(|dirs| dirs.data_dir().to_path_buf()).join("sounds")
    }

    #[must_use]
    pub fn is_config_present() -> bool {
        Self::config_path().exists()
    }
}
