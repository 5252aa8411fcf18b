//! Deciding when the alarm goes off.
//!
//! Matching is exact to the second: an active alarm set for `07:30:00` rings on
//! the tick whose wall clock reads `07:30:00` and on no other. The engine has to
//! be evaluated at least once per second or a match can be missed; the front end
//! repaints often enough for that.
//!
//! The sound is edge triggered. It starts when the clock goes from "not
//! ringing" to "ringing" and the engine remembers the second it fired in, so a
//! second tick inside that same second (or one right after a snooze or dismiss)
//! does not start it again.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::{audio::AlarmSound, store::AlarmStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnoozeState {
    pub active: bool,
    pub wake_at: Option<NaiveDateTime>,
}

impl SnoozeState {
    const fn cleared() -> Self {
        Self {
            active: false,
            wake_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingingState {
    pub is_ringing: bool,
}

pub struct AlarmEngine {
    sound: Box<dyn AlarmSound>,
    snooze: SnoozeState,
    ringing: bool,
    // the second the last ringing episode started in
    fired_at: Option<NaiveDateTime>,
    // `None` when snoozing is switched off
    snooze_for: Option<Duration>,
}

impl std::fmt::Debug for AlarmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmEngine")
            .field("snooze", &self.snooze)
            .field("ringing", &self.ringing)
            .field("fired_at", &self.fired_at)
            .field("snooze_for", &self.snooze_for)
            .finish_non_exhaustive()
    }
}

impl AlarmEngine {
    pub const DEFAULT_SNOOZE_MINUTES: u32 = 10;

    #[must_use]
    pub fn new(sound: Box<dyn AlarmSound>) -> Self {
        Self::with_snooze(
            sound,
            Some(Duration::minutes(i64::from(Self::DEFAULT_SNOOZE_MINUTES))),
        )
    }

    /// `snooze_for: None` turns snoozing into a plain dismiss
    #[must_use]
    pub fn with_snooze(sound: Box<dyn AlarmSound>, snooze_for: Option<Duration>) -> Self {
        Self {
            sound,
            snooze: SnoozeState::default(),
            ringing: false,
            fired_at: None,
            snooze_for,
        }
    }

    #[must_use]
    pub const fn is_ringing(&self) -> bool {
        self.ringing
    }

    #[must_use]
    pub const fn snooze_state(&self) -> SnoozeState {
        self.snooze
    }

    #[must_use]
    pub const fn snooze_enabled(&self) -> bool {
        self.snooze_for.is_some()
    }

    pub fn evaluate(&mut self, store: &AlarmStore, now: NaiveDateTime) -> RingingState {
        let now = truncate(now);
        let time = now.time();

        let alarm_due = store.active().any(|alarm| alarm.time() == time);
        let snooze_due = self.snooze_due(now);

        if !(alarm_due || snooze_due) {
            self.ringing = false;
        } else if self.fired_at != Some(now) {
            if snooze_due {
                self.snooze = SnoozeState::cleared();
            }
            if !self.ringing {
                log::info!(
                    "alarm going off at {}{}",
                    time.format("%H:%M:%S"),
                    if snooze_due { " (snooze)" } else { "" }
                );
                self.sound.play();
            }
            self.ringing = true;
            self.fired_at = Some(now);
        }
        // still inside the second we fired in: keep whatever state snooze or
        // dismiss left behind

        RingingState {
            is_ringing: self.ringing,
        }
    }

    fn snooze_due(&mut self, now: NaiveDateTime) -> bool {
        let Some(wake_at) = self.snooze.wake_at.filter(|_| self.snooze.active) else {
            return false;
        };
        if now.time() == wake_at.time() {
            return true;
        }
        if now > wake_at + Duration::seconds(1) {
            log::warn!(
                "missed snooze deadline {}, clearing it",
                wake_at.format("%H:%M:%S")
            );
            self.snooze = SnoozeState::cleared();
        }
        false
    }

    pub fn snooze(&mut self, now: NaiveDateTime) {
        let Some(snooze_for) = self.snooze_for else {
            log::debug!("snooze is disabled, dismissing instead");
            self.dismiss();
            return;
        };
        let wake_at = truncate(now) + snooze_for;
        log::info!("snoozing until {}", wake_at.format("%H:%M:%S"));
        self.snooze = SnoozeState {
            active: true,
            wake_at: Some(wake_at),
        };
        self.ringing = false;
        self.sound.pause();
    }

    pub fn dismiss(&mut self) {
        log::info!("alarm dismissed");
        self.snooze = SnoozeState::cleared();
        self.ringing = false;
        self.sound.stop();
    }
}

fn truncate(now: NaiveDateTime) -> NaiveDateTime {
    now.with_nanosecond(0).unwrap_or(now)
}
