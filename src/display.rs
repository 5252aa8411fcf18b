//! Which screen is showing and how clicks move between them.

use chrono::NaiveDateTime;

use crate::{
    alarm::AlarmId,
    edit::EditController,
    engine::{AlarmEngine, RingingState},
    error::ClockResult,
    layout::{EditTarget, Layout, MainTarget, Point, RingingTarget},
    store::AlarmStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// clock face with the alarm list
    #[default]
    Main,
    /// editing the time of one alarm
    Edit(AlarmId),
    /// an alarm is going off, snooze or dismiss
    Ringing,
}

#[derive(Debug, Clone)]
pub struct DisplayStateMachine {
    mode: DisplayMode,
    layout: Layout,
}

impl DisplayStateMachine {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            mode: DisplayMode::Main,
            layout,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// applies one tick: a ringing alarm always takes over the screen,
    /// otherwise the click (if there was one) is routed by the current mode
    ///
    /// # Errors
    /// if the click edits an alarm that doesn't exist, the mode is left as it was
    pub fn transition(
        &mut self,
        now: NaiveDateTime,
        ringing: RingingState,
        click: Option<Point>,
        store: &mut AlarmStore,
        engine: &mut AlarmEngine,
    ) -> ClockResult<DisplayMode> {
        if ringing.is_ringing && self.mode != DisplayMode::Ringing {
            if click.is_some() {
                log::debug!("dropping click, alarm is going off");
            }
            self.switch(DisplayMode::Ringing);
            return Ok(self.mode);
        }
        let Some(click) = click else {
            return Ok(self.mode);
        };

        match self.mode {
            DisplayMode::Main => match self.layout.hit_main(click) {
                Some(MainTarget::Toggle(id)) => {
                    EditController::new(store).toggle_active(id)?;
                }
                Some(MainTarget::Label(id)) => self.switch(DisplayMode::Edit(id)),
                None => {}
            },
            DisplayMode::Edit(id) => match self.layout.hit_edit(click) {
                Some(EditTarget::Back) => self.switch(DisplayMode::Main),
                Some(EditTarget::Stepper(field, step)) => {
                    EditController::new(store).step(id, field, step)?;
                }
                None => {}
            },
            DisplayMode::Ringing => match self.layout.hit_ringing(click) {
                Some(RingingTarget::Snooze) => {
                    engine.snooze(now);
                    self.switch(DisplayMode::Main);
                }
                Some(RingingTarget::Dismiss) => {
                    engine.dismiss();
                    self.switch(DisplayMode::Main);
                }
                None => {}
            },
        }
        Ok(self.mode)
    }

    fn switch(&mut self, mode: DisplayMode) {
        log::debug!("display {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::{alarm::Step, audio::SilentAlarmSound, edit::TimeField};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    struct Fixture {
        display: DisplayStateMachine,
        store: AlarmStore,
        engine: AlarmEngine,
    }

    impl Fixture {
        fn new() -> Self {
            let store = AlarmStore::new(3);
            Self {
                display: DisplayStateMachine::new(Layout::new(store.ids(), true)),
                store,
                engine: AlarmEngine::new(Box::<SilentAlarmSound>::default()),
            }
        }

        fn click(&mut self, ringing: bool, at_point: Point) -> ClockResult<DisplayMode> {
            self.display.transition(
                at(7, 30, 0),
                RingingState {
                    is_ringing: ringing,
                },
                Some(at_point),
                &mut self.store,
                &mut self.engine,
            )
        }

        fn label(&self, id: u8) -> Point {
            self.display.layout().slot(AlarmId(id)).unwrap().label.center()
        }

        fn toggle(&self, id: u8) -> Point {
            self.display.layout().slot(AlarmId(id)).unwrap().toggle.center()
        }

        fn stepper(&self, field: TimeField, step: Step) -> Point {
            let stepper = self
                .display
                .layout()
                .steppers
                .iter()
                .find(|s| s.field == field && s.step == step)
                .unwrap();
            stepper.region.center()
        }
    }

    #[test]
    fn starts_on_the_main_screen() {
        assert_eq!(Fixture::new().display.mode(), DisplayMode::Main);
    }

    #[test]
    fn clicking_a_label_edits_that_alarm() {
        let mut fx = Fixture::new();
        let label = fx.label(2);
        assert_eq!(fx.click(false, label).unwrap(), DisplayMode::Edit(AlarmId(2)));
    }

    #[test]
    fn clicking_a_toggle_flips_it_and_stays_on_main() {
        let mut fx = Fixture::new();
        let toggle = fx.toggle(2);
        assert_eq!(fx.click(false, toggle).unwrap(), DisplayMode::Main);
        assert!(fx.store.get(AlarmId(2)).unwrap().is_active());
        assert_eq!(fx.click(false, toggle).unwrap(), DisplayMode::Main);
        assert!(!fx.store.get(AlarmId(2)).unwrap().is_active());
    }

    #[test]
    fn steppers_edit_without_leaving() {
        let mut fx = Fixture::new();
        let label = fx.label(1);
        fx.click(false, label).unwrap();

        let hour_up = fx.stepper(TimeField::Hour, Step::Up);
        let minute_down = fx.stepper(TimeField::Minute, Step::Down);
        let meridiem_up = fx.stepper(TimeField::Meridiem, Step::Up);
        for point in [hour_up, minute_down, meridiem_up] {
            assert_eq!(fx.click(false, point).unwrap(), DisplayMode::Edit(AlarmId(1)));
        }
        // 12:00 PM -> 1:00 PM -> 1:59 PM -> 1:59 AM
        assert_eq!(
            fx.store.get(AlarmId(1)).unwrap().time(),
            NaiveTime::from_hms_opt(1, 59, 0).unwrap()
        );

        let back = fx.display.layout().back.center();
        assert_eq!(fx.click(false, back).unwrap(), DisplayMode::Main);
    }

    #[test]
    fn ringing_overrides_clicks_from_any_screen() {
        let mut fx = Fixture::new();
        let toggle = fx.toggle(1);
        assert_eq!(fx.click(true, toggle).unwrap(), DisplayMode::Ringing);
        assert!(!fx.store.get(AlarmId(1)).unwrap().is_active());

        let mut fx = Fixture::new();
        let label = fx.label(3);
        fx.click(false, label).unwrap();
        let hour_up = fx.stepper(TimeField::Hour, Step::Up);
        assert_eq!(fx.click(true, hour_up).unwrap(), DisplayMode::Ringing);
    }

    #[test]
    fn snooze_and_dismiss_return_to_main() {
        let mut fx = Fixture::new();
        let snooze = fx.display.layout().snooze.unwrap().center();
        let dismiss = fx.display.layout().dismiss.center();

        fx.click(true, snooze).unwrap();
        assert_eq!(fx.click(false, snooze).unwrap(), DisplayMode::Main);
        assert_eq!(fx.engine.snooze_state().wake_at, Some(at(7, 40, 0)));

        fx.click(true, dismiss).unwrap();
        assert_eq!(fx.click(false, dismiss).unwrap(), DisplayMode::Main);
        assert!(!fx.engine.snooze_state().active);
    }

    #[test]
    fn clicks_outside_any_button_do_nothing() {
        let mut fx = Fixture::new();
        let nowhere = Point::new(790.0, 470.0);
        assert_eq!(fx.click(false, nowhere).unwrap(), DisplayMode::Main);
        fx.click(true, nowhere).unwrap();
        assert_eq!(fx.click(false, nowhere).unwrap(), DisplayMode::Ringing);
    }

    #[test]
    fn editing_a_missing_alarm_keeps_the_mode() {
        let mut fx = Fixture::new();
        fx.display.mode = DisplayMode::Edit(AlarmId(9));
        let hour_up = fx.stepper(TimeField::Hour, Step::Up);
        assert!(fx.click(false, hour_up).is_err());
        assert_eq!(fx.display.mode(), DisplayMode::Edit(AlarmId(9)));
    }
}
