//! Where the clock gets its time from, and how it sets the device's own clock.

use std::{cell::Cell, path::PathBuf, process::Command, rc::Rc};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ClockSetError;

pub trait TimeSource {
    /// current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// the operating system's wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// a clock that only moves when told to
///
/// clones share the same reading, so a test can keep one handle and give the
/// other to the [`crate::Clock`]
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    now: Rc<Cell<NaiveDateTime>>,
}

impl ManualTimeSource {
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// write only side channel for setting the device clock
pub trait ClockSetter {
    /// # Errors
    /// if the operating system refused the new time
    fn set_system_clock(&self, date: NaiveDate, time: NaiveTime) -> Result<(), ClockSetError>;

    /// # Errors
    /// if the operating system refused the new time
    fn set_time(&self, source: &dyn TimeSource, time: NaiveTime) -> Result<(), ClockSetError> {
        self.set_system_clock(source.now().date(), time)
    }

    /// # Errors
    /// if the operating system refused the new date
    fn set_date(&self, source: &dyn TimeSource, date: NaiveDate) -> Result<(), ClockSetError> {
        self.set_system_clock(date, source.now().time())
    }
}

/// sets the clock with `date --set`, which needs root on most systems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCommand {
    program: PathBuf,
}

impl Default for DateCommand {
    fn default() -> Self {
        Self::new("date")
    }
}

impl DateCommand {
    /// any program taking the same `--set "YYYY-MM-DD HH:MM:SS"` argument as `date`
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn argument(date: NaiveDate, time: NaiveTime) -> String {
        format!("{} {}", date.format("%Y-%m-%d"), time.format("%H:%M:%S"))
    }
}

impl ClockSetter for DateCommand {
    fn set_system_clock(&self, date: NaiveDate, time: NaiveTime) -> Result<(), ClockSetError> {
        let arg = Self::argument(date, time);
        log::info!("setting system clock to {arg}");
        let output = Command::new(&self.program)
            .arg("--set")
            .arg(&arg)
            .output()?;
        if output.status.success() {
            log::debug!("{}: {}", self.program.display(), String::from_utf8_lossy(&output.stdout).trim());
            Ok(())
        } else {
            Err(ClockSetError::Rejected {
                arg,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
