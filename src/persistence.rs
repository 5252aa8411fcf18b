//! Load/save of the alarm list.
//!
//! The core only sees the [`AlarmPersistence`] trait. [`TomlAlarmFile`] is the
//! implementation the clock ships with: a `[[alarms]]` table per alarm with
//! its id, its time of day and whether it is active.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{alarm::Alarm, error::PersistenceError};

#[cfg_attr(test, mockall::automock)]
pub trait AlarmPersistence {
    /// # Errors
    /// if the alarms can't be read back, the caller falls back to defaults
    fn load_alarms(&self) -> Result<Vec<Alarm>, PersistenceError>;

    /// # Errors
    /// if the alarms can't be written
    fn save_alarms(&self, alarms: &[Alarm]) -> Result<(), PersistenceError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct AlarmFile {
    #[serde(default)]
    alarms: Vec<Alarm>,
}

#[derive(Debug, Clone)]
pub struct TomlAlarmFile {
    path: PathBuf,
}

impl TomlAlarmFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlarmPersistence for TomlAlarmFile {
    fn load_alarms(&self) -> Result<Vec<Alarm>, PersistenceError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| PersistenceError::Read {
                path: self.path.clone(),
                source,
            })?;
        let file: AlarmFile =
            toml::from_str(&contents).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.alarms)
    }

    fn save_alarms(&self, alarms: &[Alarm]) -> Result<(), PersistenceError> {
        let contents = toml::to_string(&AlarmFile {
            alarms: alarms.to_vec(),
        })?;
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, contents).map_err(write_err)?;
        log::debug!("saved {} alarms to {}", alarms.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use tempfile::tempdir;

    use super::*;
    use crate::alarm::AlarmId;

    fn alarm(id: u8, h: u32, m: u32, s: u32, active: bool) -> Alarm {
        Alarm::new(AlarmId(id), NaiveTime::from_hms_opt(h, m, s).unwrap(), active)
    }

    #[test]
    fn save_then_load_reproduces_alarms() {
        let dir = tempdir().unwrap();
        let file = TomlAlarmFile::new(dir.path().join("nested").join("alarms.toml"));
        let alarms = vec![
            alarm(1, 7, 30, 0, true),
            alarm(2, 0, 0, 59, false),
            alarm(3, 23, 59, 1, true),
        ];

        file.save_alarms(&alarms).unwrap();
        assert_eq!(file.load_alarms().unwrap(), alarms);
    }

    #[test]
    fn written_file_is_readable_toml() {
        let dir = tempdir().unwrap();
        let file = TomlAlarmFile::new(dir.path().join("alarms.toml"));
        file.save_alarms(&[alarm(1, 7, 30, 0, true)]).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("[[alarms]]"));
        assert!(contents.contains("07:30:00"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let file = TomlAlarmFile::new(dir.path().join("absent.toml"));
        assert!(matches!(
            file.load_alarms(),
            Err(PersistenceError::Read { .. })
        ));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alarms.toml");
        std::fs::write(&path, "alarms = \"not a list\"").unwrap();
        assert!(matches!(
            TomlAlarmFile::new(path).load_alarms(),
            Err(PersistenceError::Parse { .. })
        ));
    }
}
