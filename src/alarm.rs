use std::{fmt, ops::Not, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// alarms are numbered `1..=N` and keep their number for the lifetime of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(pub u8);

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// represents an alarm
/// contains the time of day that the alarm should go off at
/// and whether it should go off at all
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub(crate) id: AlarmId,
    #[serde(with = "toml_datetime_compat")]
    pub(crate) time: NaiveTime,
    #[serde(default)]
    pub(crate) active: bool,
}

impl Alarm {
    /// fresh alarms ring at noon but start out disabled
    pub const DEFAULT_HOUR: u32 = 12;

    #[must_use]
    pub fn new(id: AlarmId, time: NaiveTime, active: bool) -> Self {
        Self {
            id,
            time: truncate_to_second(time),
            active,
        }
    }

    #[must_use]
    pub fn with_default_time(id: AlarmId) -> Self {
        Self::new(id, default_time(), false)
    }

    #[must_use]
    pub const fn id(&self) -> AlarmId {
        self.id
    }

    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_time(&mut self, time: NaiveTime) {
        self.time = truncate_to_second(time);
    }

    #[must_use]
    pub fn meridiem(&self) -> Meridiem {
        Meridiem::of(self.time)
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {}",
            self.id,
            self.time.format("%I:%M:%S %p"),
            if self.active { "on" } else { "off" }
        )
    }
}

#[must_use]
pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(Alarm::DEFAULT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[must_use]
pub fn truncate_to_second(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Meridiem {
    #[default]
    AM,
    PM,
}

impl Meridiem {
    #[must_use]
    pub fn of(time: NaiveTime) -> Self {
        if time.hour12().0 {
            Self::PM
        } else {
            Self::AM
        }
    }

    /// converts a 12 hour clock reading into the 24 hour one
    /// 12 AM is midnight and 12 PM is noon
    #[must_use]
    pub const fn to_24_hour(self, hour12: u32) -> u32 {
        match (self, hour12) {
            (Self::AM, 12) => 0,
            (Self::AM, hour) => hour,
            (Self::PM, 12) => 12,
            (Self::PM, hour) => hour + 12,
        }
    }
}

impl Not for Meridiem {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::AM => Self::PM,
            Self::PM => Self::AM,
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AM => "AM",
            Self::PM => "PM",
        })
    }
}

impl FromStr for Meridiem {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Self::AM),
            "PM" => Ok(Self::PM),
            other => Err(ClockError::InvalidInput(format!(
                "expected AM or PM, got {other:?}"
            ))),
        }
    }
}

/// direction of a stepper button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

impl Step {
    #[must_use]
    pub const fn signum(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl Not for Step {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn twelve_hour_conversion_handles_noon_and_midnight() {
        assert_eq!(Meridiem::AM.to_24_hour(12), 0);
        assert_eq!(Meridiem::AM.to_24_hour(7), 7);
        assert_eq!(Meridiem::PM.to_24_hour(12), 12);
        assert_eq!(Meridiem::PM.to_24_hour(7), 19);
    }

    #[test]
    fn meridiem_of_time() {
        assert_eq!(Meridiem::of(hms(0, 0, 0)), Meridiem::AM);
        assert_eq!(Meridiem::of(hms(11, 59, 59)), Meridiem::AM);
        assert_eq!(Meridiem::of(hms(12, 0, 0)), Meridiem::PM);
        assert_eq!(Meridiem::of(hms(23, 0, 0)), Meridiem::PM);
    }

    #[test]
    fn meridiem_parses_case_insensitively() {
        assert_eq!(" pm ".parse::<Meridiem>().unwrap(), Meridiem::PM);
        assert_eq!("Am".parse::<Meridiem>().unwrap(), Meridiem::AM);
        assert!(matches!(
            "noon".parse::<Meridiem>(),
            Err(ClockError::InvalidInput(_))
        ));
    }

    #[test]
    fn new_alarm_drops_sub_second_precision() {
        let time = NaiveTime::from_hms_milli_opt(7, 30, 0, 999).unwrap();
        let alarm = Alarm::new(AlarmId(1), time, true);
        assert_eq!(alarm.time(), hms(7, 30, 0));
    }

    #[test]
    fn default_alarm_is_noon_and_disabled() {
        let alarm = Alarm::with_default_time(AlarmId(3));
        assert_eq!(alarm.time(), hms(12, 0, 0));
        assert!(!alarm.is_active());
        assert_eq!(alarm.to_string(), "3  12:00:00 PM  off");
    }
}
