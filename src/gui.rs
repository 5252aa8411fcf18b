use std::{f32::consts::TAU, time::Duration};

use chrono::{NaiveDateTime, Timelike};
use eframe::egui::{
    self, Align2, CentralPanel, Color32, Context, CornerRadius, Event, FontId, Painter,
    PointerButton, Pos2, Rect, Shape, Stroke, ViewportBuilder,
};

use crate::{
    alarm::AlarmId,
    config::{Settings, Theme},
    display::DisplayMode,
    edit::TimeField,
    layout::{Point, Region, SCREEN_HEIGHT, SCREEN_WIDTH},
    Clock,
};

// purple
const PRIMARY: Color32 = Color32::from_rgb(170, 0, 212);
const ALERT: Color32 = Color32::from_rgb(250, 0, 5);
const STROKE_WEIGHT: f32 = 10.0;
const FACE_CENTER: Pos2 = Pos2::new(405.0, 250.0);
const FACE_RADIUS: f32 = 170.0;
const BORDER: f32 = 25.0;
// alarms are matched to the second, so never let the window sleep for a whole one
const REPAINT_EVERY: Duration = Duration::from_millis(250);

impl From<Theme> for egui::Visuals {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

/// opens the clock window and blocks until it is closed
///
/// # Errors
/// if the window can't be created
pub fn run(clock: Clock, settings: Settings) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([SCREEN_WIDTH, SCREEN_HEIGHT])
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "Snooze Clock",
        native_options,
        Box::new(move |_| Ok(Box::new(ClockApp::new(clock, settings)))),
    )
}

pub struct ClockApp {
    clock: Clock,
    settings: Settings,
    // last pointer position, so a repeated move event to the same spot doesn't cancel a click
    pointer_at: Option<Pos2>,
}

impl ClockApp {
    #[must_use]
    pub const fn new(clock: Clock, settings: Settings) -> Self {
        Self {
            clock,
            settings,
            pointer_at: None,
        }
    }

    /// hands this frame's pointer events to the clock, in order
    fn feed_input(&mut self, ctx: &Context) {
        let (events, toggle_theme) =
            ctx.input(|i| (i.events.clone(), i.key_pressed(egui::Key::T)));
        if toggle_theme {
            self.settings.theme = !self.settings.theme;
        }
        for event in events {
            match event {
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    self.pointer_at = Some(pos);
                    if pressed {
                        self.clock.pointer_press(pos.x, pos.y);
                    } else {
                        self.clock.pointer_release(pos.x, pos.y);
                    }
                }
                Event::PointerMoved(pos) if self.pointer_at != Some(pos) => {
                    self.pointer_at = Some(pos);
                    self.clock.pointer_move();
                }
                Event::PointerGone => {
                    self.pointer_at = None;
                    self.clock.pointer_move();
                }
                _ => {}
            }
        }
    }

    fn paint_main(&self, painter: &Painter, fg: Color32) {
        let now = self.clock.now();

        // the ring fills up over the day
        let seconds = now.num_seconds_from_midnight() as f32;
        let sweep = seconds / 86_400.0 * TAU;
        let steps = (sweep / TAU * 180.0).ceil().max(1.0) as usize;
        let arc = (0..=steps)
            .map(|i| {
                let angle = sweep * i as f32 / steps as f32 - TAU / 4.0;
                FACE_CENTER + FACE_RADIUS * egui::vec2(angle.cos(), angle.sin())
            })
            .collect();
        painter.add(Shape::line(arc, Stroke::new(STROKE_WEIGHT, PRIMARY)));

        painter.text(
            FACE_CENTER,
            Align2::CENTER_CENTER,
            now.format(&self.settings.time_format).to_string(),
            FontId::proportional(55.0),
            fg,
        );
        painter.text(
            FACE_CENTER + egui::vec2(0.0, 70.0),
            Align2::CENTER_CENTER,
            now.format("%p").to_string(),
            FontId::proportional(55.0),
            PRIMARY,
        );
        painter.text(
            Pos2::new(SCREEN_WIDTH - 10.0, 220.0),
            Align2::RIGHT_BOTTOM,
            now.format("%A").to_string(),
            FontId::proportional(35.0),
            PRIMARY,
        );
        painter.text(
            Pos2::new(SCREEN_WIDTH - 10.0, 270.0),
            Align2::RIGHT_BOTTOM,
            now.format("%b / %d / %y").to_string(),
            FontId::proportional(30.0),
            PRIMARY,
        );

        for slot in &self.clock.layout().slots {
            let Ok(alarm) = self.clock.store().get(slot.id) else {
                continue;
            };
            let Region::Circle { center, radius } = slot.toggle else {
                continue;
            };
            if alarm.is_active() {
                painter.circle_filled(pos(center), radius, PRIMARY);
            } else {
                painter.circle_stroke(pos(center), radius, Stroke::new(2.0, PRIMARY));
            }
            painter.text(
                pos(slot.anchor),
                Align2::RIGHT_BOTTOM,
                slot.id.to_string(),
                FontId::proportional(35.0),
                fg,
            );
            painter.text(
                rect(slot.label).left_center(),
                Align2::LEFT_CENTER,
                alarm.time().format("%I:%M %p").to_string(),
                FontId::proportional(35.0),
                fg,
            );
        }

        if let Some(wake_at) = self.clock.engine().snooze_state().wake_at {
            painter.text(
                Pos2::new(SCREEN_WIDTH - 10.0, SCREEN_HEIGHT - 10.0),
                Align2::RIGHT_BOTTOM,
                format!("snoozing until {}", wake_at.format("%I:%M %p")),
                FontId::proportional(20.0),
                fg,
            );
        }
    }

    fn paint_edit(&self, painter: &Painter, fg: Color32, id: AlarmId) {
        let Ok(alarm) = self.clock.store().get(id) else {
            return;
        };
        painter.text(
            Pos2::new(SCREEN_WIDTH / 2.0, 50.0),
            Align2::CENTER_CENTER,
            format!("Set Alarm {id}"),
            FontId::proportional(40.0),
            fg,
        );

        for stepper in &self.clock.layout().steppers {
            painter.add(Shape::convex_polygon(
                stepper.triangle.iter().copied().map(pos).collect(),
                PRIMARY,
                Stroke::NONE,
            ));
        }
        // one reading per stepper column, halfway between its two triangles
        let columns = self
            .clock
            .layout()
            .steppers
            .chunks(2)
            .filter_map(|pair| Some((pair.first()?, pair.last()?)));
        for (up, down) in columns {
            let text = match up.field {
                TimeField::Hour => alarm.time().format("%I"),
                TimeField::Minute => alarm.time().format("%M"),
                TimeField::Meridiem => alarm.time().format("%p"),
            };
            let at = pos(up.region.center()).lerp(pos(down.region.center()), 0.5);
            painter.text(
                at,
                Align2::CENTER_CENTER,
                text.to_string(),
                FontId::proportional(100.0),
                fg,
            );
        }

        // back arrow
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(20.0, 19.0), egui::vec2(35.0, 2.0)),
            CornerRadius::ZERO,
            PRIMARY,
        );
        painter.add(Shape::convex_polygon(
            vec![
                Pos2::new(15.0, 20.0),
                Pos2::new(20.0, 15.0),
                Pos2::new(20.0, 25.0),
            ],
            PRIMARY,
            Stroke::NONE,
        ));
    }

    fn paint_ringing(&self, painter: &Painter, now: NaiveDateTime) {
        // blink the border twice a second
        if now.nanosecond() < 500_000_000 {
            let screen = Rect::from_min_size(Pos2::ZERO, egui::vec2(SCREEN_WIDTH, SCREEN_HEIGHT));
            for strip in [
                Rect::from_min_max(screen.min, Pos2::new(screen.max.x, BORDER)),
                Rect::from_min_max(Pos2::new(0.0, screen.max.y - BORDER), screen.max),
                Rect::from_min_max(screen.min, Pos2::new(BORDER, screen.max.y)),
                Rect::from_min_max(Pos2::new(screen.max.x - BORDER, 0.0), screen.max),
            ] {
                painter.rect_filled(strip, CornerRadius::ZERO, ALERT);
            }
        }

        let layout = self.clock.layout();
        let buttons = layout
            .snooze
            .map(|snooze| (snooze, "SNOOZE"))
            .into_iter()
            .chain([(layout.dismiss, "ALARM OFF")]);
        for (region, label) in buttons {
            painter.rect_filled(rect(region), CornerRadius::same(9), ALERT);
            painter.text(
                rect(region).center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(65.0),
                Color32::WHITE,
            );
        }

        painter.text(
            Pos2::new(SCREEN_WIDTH / 2.0, 400.0),
            Align2::CENTER_CENTER,
            now.format("%I:%M %p").to_string(),
            FontId::proportional(60.0),
            ALERT,
        );
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(REPAINT_EVERY);
        self.feed_input(ctx);
        if let Err(e) = self.clock.tick() {
            log::error!("{e}");
        }

        ctx.set_visuals(self.settings.theme.into());
        let background = ctx.style().visuals.panel_fill;
        CentralPanel::default()
            .frame(egui::Frame::NONE.fill(background))
            .show(ctx, |ui| {
                let fg = ui.visuals().strong_text_color();
                let painter = ui.painter();
                match self.clock.mode() {
                    DisplayMode::Main => self.paint_main(painter, fg),
                    DisplayMode::Edit(id) => self.paint_edit(painter, fg, id),
                    DisplayMode::Ringing => self.paint_ringing(painter, self.clock.now()),
                }
            });
    }
}

fn pos(point: Point) -> Pos2 {
    Pos2::new(point.x, point.y)
}

fn rect(region: Region) -> Rect {
    match region {
        Region::Rect {
            origin,
            width,
            height,
        } => Rect::from_min_size(pos(origin), egui::vec2(width, height)),
        Region::Circle { center, radius } => {
            Rect::from_center_size(pos(center), egui::Vec2::splat(radius * 2.0))
        }
    }
}
