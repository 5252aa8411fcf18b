//! Screen geometry and hit testing.
//!
//! Everything is in screen pixels on the 800x480 panel, origin top left.

use crate::{
    alarm::{AlarmId, Step},
    edit::TimeField,
};

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 480.0;

// alarm list on the left of the clock face
const ALARM_X: f32 = 80.0;
const ALARM_FIRST_Y: f32 = 135.0;
const ALARM_SPACING: f32 = 110.0;
// the time label sits below and to the left of the alarm number
const LABEL_INDENT: f32 = 72.0;
const LABEL_DROP: f32 = 40.0;
const ALARM_LABEL_SIZE: (f32, f32) = (150.0, 50.0);
const TOGGLE_RADIUS: f32 = 20.0;
/// how many alarms the list has room for
pub const MAX_ALARMS: u8 = 3;

// alarm edit screen, one column per field
const STEPPER_X: [f32; 3] = [160.0, 360.0, 550.0];
const TOP_STEPPER_Y: f32 = 180.0;
const BOTTOM_STEPPER_Y: f32 = 320.0;
const STEPPER_SIZE: f32 = 50.0;
const BACK_SIZE: f32 = 50.0;

// firing screen
const BUTTON_X: f32 = 210.0;
const BUTTON_SIZE: (f32, f32) = (380.0, 100.0);
const SNOOZE_Y: f32 = 50.0;
const DISMISS_Y: f32 = 175.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// edges count as inside
    Rect {
        origin: Point,
        width: f32,
        height: f32,
    },
    Circle { center: Point, radius: f32 },
}

impl Region {
    #[must_use]
    pub const fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::Rect {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        match *self {
            Self::Rect {
                origin,
                width,
                height,
            } => Point::new(origin.x + width / 2.0, origin.y + height / 2.0),
            Self::Circle { center, .. } => center,
        }
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        match *self {
            Self::Rect {
                origin,
                width,
                height,
            } => {
                (origin.x..=origin.x + width).contains(&point.x)
                    && (origin.y..=origin.y + height).contains(&point.y)
            }
            Self::Circle { center, radius } => {
                (point.x - center.x).hypot(point.y - center.y) < radius
            }
        }
    }
}

/// where one alarm is drawn on the main screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmSlot {
    pub id: AlarmId,
    /// baseline of the alarm number
    pub anchor: Point,
    /// the alarm time, click to edit
    pub label: Region,
    /// the dot next to the number, click to enable/disable
    pub toggle: Region,
}

impl AlarmSlot {
    fn new(id: AlarmId, index: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let y = ALARM_SPACING.mul_add(index as f32, ALARM_FIRST_Y);
        let anchor = Point::new(ALARM_X, y);
        Self {
            id,
            anchor,
            label: Region::rect(
                ALARM_X - LABEL_INDENT,
                y + LABEL_DROP - ALARM_LABEL_SIZE.1 / 2.0,
                ALARM_LABEL_SIZE.0,
                ALARM_LABEL_SIZE.1,
            ),
            toggle: Region::Circle {
                center: Point::new(ALARM_X + 10.0, y - 12.0),
                radius: TOGGLE_RADIUS,
            },
        }
    }
}

/// a triangle button on the edit screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stepper {
    pub field: TimeField,
    pub step: Step,
    /// the square around the triangle
    pub region: Region,
    pub triangle: [Point; 3],
}

impl Stepper {
    fn new(field: TimeField, step: Step, x: f32) -> Self {
        // up triangles point up from their base, down triangles hang below it
        let (base_y, tip_y) = match step {
            Step::Up => (TOP_STEPPER_Y, TOP_STEPPER_Y - STEPPER_SIZE),
            Step::Down => (BOTTOM_STEPPER_Y, BOTTOM_STEPPER_Y + STEPPER_SIZE),
        };
        let top = base_y.min(tip_y);
        Self {
            field,
            step,
            region: Region::rect(x, top, STEPPER_SIZE, STEPPER_SIZE),
            triangle: [
                Point::new(x, base_y),
                Point::new(x + STEPPER_SIZE, base_y),
                Point::new(x + STEPPER_SIZE / 2.0, tip_y),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainTarget {
    Toggle(AlarmId),
    Label(AlarmId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Back,
    Stepper(TimeField, Step),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingingTarget {
    Snooze,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub slots: Vec<AlarmSlot>,
    pub steppers: Vec<Stepper>,
    pub back: Region,
    /// missing when snoozing is turned off
    pub snooze: Option<Region>,
    pub dismiss: Region,
}

impl Layout {
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = AlarmId>, snooze: bool) -> Self {
        let fields = [TimeField::Hour, TimeField::Minute, TimeField::Meridiem];
        Self {
            slots: ids
                .into_iter()
                .enumerate()
                .map(|(index, id)| AlarmSlot::new(id, index))
                .collect(),
            steppers: fields
                .into_iter()
                .zip(STEPPER_X)
                .flat_map(|(field, x)| {
                    [Step::Up, Step::Down].map(|step| Stepper::new(field, step, x))
                })
                .collect(),
            back: Region::rect(0.0, 0.0, BACK_SIZE, BACK_SIZE),
            snooze: snooze
                .then(|| Region::rect(BUTTON_X, SNOOZE_Y, BUTTON_SIZE.0, BUTTON_SIZE.1)),
            dismiss: Region::rect(BUTTON_X, DISMISS_Y, BUTTON_SIZE.0, BUTTON_SIZE.1),
        }
    }

    #[must_use]
    pub fn slot(&self, id: AlarmId) -> Option<&AlarmSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// toggles win over labels
    #[must_use]
    pub fn hit_main(&self, point: Point) -> Option<MainTarget> {
        let toggle = self.slots.iter().find(|slot| slot.toggle.contains(point));
        let label = || self.slots.iter().find(|slot| slot.label.contains(point));
        toggle
            .map(|slot| MainTarget::Toggle(slot.id))
            .or_else(|| label().map(|slot| MainTarget::Label(slot.id)))
    }

    #[must_use]
    pub fn hit_edit(&self, point: Point) -> Option<EditTarget> {
        if self.back.contains(point) {
            return Some(EditTarget::Back);
        }
        self.steppers.iter().find_map(|stepper| {
            stepper
                .region
                .contains(point)
                .then_some(EditTarget::Stepper(stepper.field, stepper.step))
        })
    }

    #[must_use]
    pub fn hit_ringing(&self, point: Point) -> Option<RingingTarget> {
        if self.snooze.is_some_and(|snooze| snooze.contains(point)) {
            Some(RingingTarget::Snooze)
        } else if self.dismiss.contains(point) {
            Some(RingingTarget::Dismiss)
        } else {
            None
        }
    }
}
