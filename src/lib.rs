#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

//! A bedside alarm clock with a handful of alarms, snooze and a touch screen.
//!
//! [`Clock`] owns everything and is driven one tick at a time: the host feeds
//! it pointer input, calls [`Clock::tick`] once per frame and draws whatever
//! [`Clock::mode`] says is showing.

use chrono::{Duration, NaiveDateTime};

pub mod alarm;
pub mod audio;
pub mod config;
pub mod display;
pub mod edit;
pub mod engine;
pub mod error;
pub mod input;
pub mod layout;
pub mod persistence;
pub mod store;
pub mod time_source;

/// egui front end
#[cfg(feature = "desktop")]
pub mod gui;

use audio::AlarmSound;
use config::Settings;
use display::{DisplayMode, DisplayStateMachine};
use edit::EditController;
use engine::{AlarmEngine, RingingState};
use error::ClockResult;
use input::PointerLatch;
use layout::{Layout, Point, MAX_ALARMS};
use persistence::{AlarmPersistence, TomlAlarmFile};
use store::AlarmStore;
use time_source::TimeSource;

/// the optional parts of the clock, picked when it is built
pub struct Capabilities {
    pub sound: Box<dyn AlarmSound>,
    /// `None` keeps alarms in memory only
    pub persistence: Option<Box<dyn AlarmPersistence>>,
    /// `None` turns the snooze button off
    pub snooze: Option<Duration>,
}

impl Capabilities {
    #[must_use]
    pub fn from_settings(settings: &Settings, sound: Box<dyn AlarmSound>) -> Self {
        Self {
            sound,
            persistence: settings.persist.then(|| {
                Box::new(TomlAlarmFile::new(Settings::alarms_path())) as Box<dyn AlarmPersistence>
            }),
            snooze: settings.snooze_duration(),
        }
    }
}

pub struct Clock {
    time: Box<dyn TimeSource>,
    store: AlarmStore,
    engine: AlarmEngine,
    display: DisplayStateMachine,
    pointer: PointerLatch,
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("store", &self.store)
            .field("engine", &self.engine)
            .field("display", &self.display)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}

impl Clock {
    /// `alarm_count` is capped at what the screen has room for
    #[must_use]
    pub fn new(alarm_count: u8, time: Box<dyn TimeSource>, capabilities: Capabilities) -> Self {
        if alarm_count > MAX_ALARMS {
            log::warn!(
                "only {MAX_ALARMS} alarms fit on screen, ignoring the other {}",
                alarm_count - MAX_ALARMS
            );
        }
        let alarm_count = alarm_count.min(MAX_ALARMS);
        let Capabilities {
            sound,
            persistence,
            snooze,
        } = capabilities;
        let store = match persistence {
            Some(persistence) => AlarmStore::load(alarm_count, persistence),
            None => AlarmStore::new(alarm_count),
        };
        let layout = Layout::new(store.ids(), snooze.is_some());
        Self {
            time,
            store,
            engine: AlarmEngine::with_snooze(sound, snooze),
            display: DisplayStateMachine::new(layout),
            pointer: PointerLatch::new(),
        }
    }

    /// evaluate the alarms, then move the display along
    ///
    /// # Errors
    /// if the click of this tick tried to edit an alarm that doesn't exist,
    /// everything is left in its last valid state
    pub fn tick(&mut self) -> ClockResult<DisplayMode> {
        let now = self.time.now();
        let ringing = self.engine.evaluate(&self.store, now);
        let click = self.pointer.take_click();
        self.display
            .transition(now, ringing, click, &mut self.store, &mut self.engine)
    }

    pub fn pointer_press(&mut self, x: f32, y: f32) {
        self.pointer.press(Point::new(x, y));
    }

    pub fn pointer_release(&mut self, x: f32, y: f32) {
        self.pointer.release(Point::new(x, y));
    }

    pub fn pointer_move(&mut self) {
        self.pointer.moved();
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.time.now()
    }

    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.display.mode()
    }

    #[must_use]
    pub const fn ringing(&self) -> RingingState {
        RingingState {
            is_ringing: self.engine.is_ringing(),
        }
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        self.display.layout()
    }

    #[must_use]
    pub const fn store(&self) -> &AlarmStore {
        &self.store
    }

    #[must_use]
    pub const fn engine(&self) -> &AlarmEngine {
        &self.engine
    }

    /// for edits that don't come from the screen
    pub fn editor(&mut self) -> EditController<'_> {
        EditController::new(&mut self.store)
    }
}
