use std::collections::BTreeMap;

use crate::{
    alarm::{Alarm, AlarmId},
    error::{ClockError, ClockResult},
    persistence::AlarmPersistence,
};

/// the fixed set of alarms, one per id in `1..=N`, kept sorted by id
pub struct AlarmStore {
    alarms: Vec<Alarm>,
    persistence: Option<Box<dyn AlarmPersistence>>,
}

impl std::fmt::Debug for AlarmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmStore")
            .field("alarms", &self.alarms)
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl AlarmStore {
    /// `count` default alarms (noon, disabled) that only live in memory
    #[must_use]
    pub fn new(count: u8) -> Self {
        Self {
            alarms: (1..=count).map(|id| Alarm::with_default_time(AlarmId(id))).collect(),
            persistence: None,
        }
    }

    /// loads the alarms through `persistence`, falling back to defaults when
    /// they can't be read, and keeps writing every change back through it
    #[must_use]
    pub fn load(count: u8, persistence: Box<dyn AlarmPersistence>) -> Self {
        let alarms = match persistence.load_alarms() {
            Ok(loaded) => reconcile(count, loaded),
            Err(e) => {
                log::warn!("{e}, starting with {count} default alarms");
                Self::new(count).alarms
            }
        };
        Self {
            alarms,
            persistence: Some(persistence),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    #[must_use]
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn ids(&self) -> impl Iterator<Item = AlarmId> + '_ {
        self.alarms.iter().map(Alarm::id)
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if no alarm has that id
    pub fn get(&self, id: AlarmId) -> ClockResult<&Alarm> {
        self.alarms
            .iter()
            .find(|alarm| alarm.id == id)
            .ok_or(ClockError::AlarmNotFound(id))
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if no alarm has that id
    pub(crate) fn get_mut(&mut self, id: AlarmId) -> ClockResult<&mut Alarm> {
        self.alarms
            .iter_mut()
            .find(|alarm| alarm.id == id)
            .ok_or(ClockError::AlarmNotFound(id))
    }

    pub fn active(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter().filter(|alarm| alarm.active)
    }

    /// write the alarms to disk (if we have somewhere to write them to)
    /// a failed save is logged, the running clock keeps its in memory state
    pub fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            match persistence.save_alarms(&self.alarms) {
                Ok(()) => log::info!("saved alarms"),
                Err(e) => log::error!("{e}"),
            }
        }
    }
}

/// keeps one alarm per id in `1..=count`, dropping anything else that was on disk
fn reconcile(count: u8, loaded: Vec<Alarm>) -> Vec<Alarm> {
    let mut by_id = BTreeMap::new();
    for alarm in loaded {
        if alarm.id.0 == 0 || alarm.id.0 > count {
            log::warn!("ignoring stored alarm with unknown id {}", alarm.id);
        } else if by_id.contains_key(&alarm.id) {
            log::warn!("ignoring duplicate stored alarm {}", alarm.id);
        } else {
            by_id.insert(alarm.id, Alarm::new(alarm.id, alarm.time, alarm.active));
        }
    }
    (1..=count)
        .map(AlarmId)
        .map(|id| {
            by_id
                .remove(&id)
                .unwrap_or_else(|| Alarm::with_default_time(id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::{error::PersistenceError, persistence::MockAlarmPersistence};

    fn alarm(id: u8, h: u32, m: u32, active: bool) -> Alarm {
        Alarm::new(AlarmId(id), NaiveTime::from_hms_opt(h, m, 0).unwrap(), active)
    }

    fn not_found() -> PersistenceError {
        PersistenceError::Read {
            path: "alarms.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }

    #[test]
    fn new_store_has_one_alarm_per_id() {
        let store = AlarmStore::new(3);
        assert_eq!(
            store.ids().collect::<Vec<_>>(),
            vec![AlarmId(1), AlarmId(2), AlarmId(3)]
        );
        assert_eq!(store.active().count(), 0);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = AlarmStore::new(3);
        assert!(matches!(
            store.get(AlarmId(4)),
            Err(ClockError::AlarmNotFound(AlarmId(4)))
        ));
        assert!(store.get(AlarmId(0)).is_err());
    }

    #[test]
    fn failed_load_falls_back_to_defaults() {
        let mut persistence = MockAlarmPersistence::new();
        persistence
            .expect_load_alarms()
            .times(1)
            .returning(|| Err(not_found()));

        let store = AlarmStore::load(3, Box::new(persistence));
        assert_eq!(store.alarms(), AlarmStore::new(3).alarms());
    }

    #[test]
    fn load_repairs_an_inconsistent_list() {
        let mut persistence = MockAlarmPersistence::new();
        persistence.expect_load_alarms().returning(|| {
            Ok(vec![
                alarm(3, 6, 0, true),
                alarm(1, 7, 0, true),
                alarm(1, 8, 0, false),
                alarm(9, 9, 0, true),
            ])
        });

        let store = AlarmStore::load(3, Box::new(persistence));
        assert_eq!(
            store.alarms(),
            &[
                alarm(1, 7, 0, true),
                Alarm::with_default_time(AlarmId(2)),
                alarm(3, 6, 0, true),
            ]
        );
    }

    #[test]
    fn persist_writes_through_and_survives_failure() {
        let mut persistence = MockAlarmPersistence::new();
        persistence.expect_load_alarms().returning(|| Ok(vec![]));
        persistence
            .expect_save_alarms()
            .withf(|alarms| alarms.len() == 3)
            .times(1)
            .returning(|_| Err(PersistenceError::Serialize(serde::ser::Error::custom("disk full"))));

        let store = AlarmStore::load(3, Box::new(persistence));
        store.persist();
        assert_eq!(store.len(), 3);
    }
}
