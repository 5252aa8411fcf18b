//! Editing alarms.
//!
//! Every change goes through [`EditController`], which validates it, applies it
//! to the alarm in the [`AlarmStore`] and writes the store back to disk.
//!
//! Stepping works on the 24 hour time stored in the alarm and wraps around the
//! day, so going up from 11 PM lands on 12 AM and going down from 12 AM lands
//! on 11 PM without any special casing for the 12 hour display.

use chrono::{Duration, NaiveTime, Timelike};

use crate::{
    alarm::{AlarmId, Meridiem, Step},
    error::{ClockError, ClockResult},
    store::AlarmStore,
};

/// which part of the alarm time a stepper changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hour,
    Minute,
    Meridiem,
}

#[derive(Debug)]
pub struct EditController<'s> {
    store: &'s mut AlarmStore,
}

impl<'s> EditController<'s> {
    pub fn new(store: &'s mut AlarmStore) -> Self {
        Self { store }
    }

    /// sets the alarm from a 12 hour clock reading
    ///
    /// # Errors
    /// [`ClockError::InvalidInput`] if any component is out of range,
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn set_alarm_time(
        &mut self,
        id: AlarmId,
        hour12: u32,
        minute: u32,
        second: u32,
        meridiem: Meridiem,
    ) -> ClockResult<()> {
        if !(1..=12).contains(&hour12) {
            return Err(ClockError::InvalidInput(format!(
                "hour must be between 1 and 12, got {hour12}"
            )));
        }
        let time = NaiveTime::from_hms_opt(meridiem.to_24_hour(hour12), minute, second)
            .ok_or_else(|| {
                ClockError::InvalidInput(format!(
                    "{minute:02}:{second:02} is not a valid minute and second"
                ))
            })?;
        self.set_alarm_time_24(id, time)
    }

    /// the raw text entry path, nothing is clamped, anything that doesn't
    /// parse is rejected and the alarm is left alone
    ///
    /// # Errors
    /// [`ClockError::InvalidInput`] if a component doesn't parse or is out of
    /// range, [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn set_alarm_time_from_text(
        &mut self,
        id: AlarmId,
        hour: &str,
        minute: &str,
        second: &str,
        meridiem: &str,
    ) -> ClockResult<()> {
        let hour12 = parse_component("hour", hour)?;
        let minute = parse_component("minute", minute)?;
        let second = parse_component("second", second)?;
        let meridiem = meridiem.parse()?;
        self.set_alarm_time(id, hour12, minute, second, meridiem)
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn set_alarm_time_24(&mut self, id: AlarmId, time: NaiveTime) -> ClockResult<()> {
        self.store.get_mut(id)?.set_time(time);
        log::debug!("alarm {id} set to {}", time.format("%H:%M:%S"));
        self.store.persist();
        Ok(())
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn set_active(&mut self, id: AlarmId, active: bool) -> ClockResult<()> {
        self.store.get_mut(id)?.active = active;
        log::debug!("alarm {id} {}", if active { "enabled" } else { "disabled" });
        self.store.persist();
        Ok(())
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn toggle_active(&mut self, id: AlarmId) -> ClockResult<bool> {
        let active = !self.store.get(id)?.is_active();
        self.set_active(id, active)?;
        Ok(active)
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn step_hour(&mut self, id: AlarmId, step: Step) -> ClockResult<()> {
        self.shift(id, Duration::hours(step.signum()))
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn step_minute(&mut self, id: AlarmId, step: Step) -> ClockResult<()> {
        let time = self.store.get(id)?.time();
        let minute = (i64::from(time.minute()) + step.signum()).rem_euclid(60);
        let time = u32::try_from(minute)
            .ok()
            .and_then(|minute| time.with_minute(minute))
            .unwrap_or(time);
        self.set_alarm_time_24(id, time)
    }

    /// flips between AM and PM, keeping the hour on the 12 hour clock
    ///
    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn step_meridiem(&mut self, id: AlarmId, step: Step) -> ClockResult<()> {
        self.shift(id, Duration::hours(12 * step.signum()))
    }

    /// # Errors
    /// [`ClockError::AlarmNotFound`] if there is no such alarm
    pub fn step(&mut self, id: AlarmId, field: TimeField, step: Step) -> ClockResult<()> {
        match field {
            TimeField::Hour => self.step_hour(id, step),
            TimeField::Minute => self.step_minute(id, step),
            TimeField::Meridiem => self.step_meridiem(id, step),
        }
    }

    fn shift(&mut self, id: AlarmId, by: Duration) -> ClockResult<()> {
        // NaiveTime + Duration wraps around midnight
        let time = self.store.get(id)?.time() + by;
        self.set_alarm_time_24(id, time)
    }
}

fn parse_component(name: &str, raw: &str) -> ClockResult<u32> {
    raw.trim()
        .parse()
        .map_err(|e| ClockError::InvalidInput(format!("{name} {raw:?}: {e}")))
}
