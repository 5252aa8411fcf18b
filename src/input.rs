use crate::layout::Point;

/// pointer input latched between ticks
///
/// a click only counts once the pointer has been pressed and then released
/// without moving in between, any movement throws the half finished click
/// away so dragging across the screen never triggers anything
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerLatch {
    pressed: Option<Point>,
    released: Option<Point>,
}

impl PointerLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// a press while a finished click is still waiting is ignored, the
    /// waiting click goes out on the next tick
    pub fn press(&mut self, at: Point) {
        if self.released.is_some() {
            return;
        }
        self.pressed = Some(at);
    }

    pub fn release(&mut self, at: Point) {
        if self.pressed.is_some() && self.released.is_none() {
            self.released = Some(at);
        }
    }

    /// only cancels a click still in progress
    pub fn moved(&mut self) {
        if self.released.is_none() {
            self.pressed = None;
        }
    }

    /// the point a completed click was released at, consuming it
    pub fn take_click(&mut self) -> Option<Point> {
        match (self.pressed, self.released) {
            (Some(_), Some(at)) => {
                *self = Self::default();
                Some(at)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERE: Point = Point::new(10.0, 20.0);

    #[test]
    fn press_then_release_is_a_click() {
        let mut latch = PointerLatch::new();
        latch.press(HERE);
        assert_eq!(latch.take_click(), None);
        latch.release(HERE);
        assert_eq!(latch.take_click(), Some(HERE));
        // consumed
        assert_eq!(latch.take_click(), None);
    }

    #[test]
    fn movement_cancels_the_click() {
        let mut latch = PointerLatch::new();
        latch.press(HERE);
        latch.moved();
        latch.release(Point::new(300.0, 20.0));
        assert_eq!(latch.take_click(), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut latch = PointerLatch::new();
        latch.release(HERE);
        assert_eq!(latch.take_click(), None);
    }

    #[test]
    fn second_tap_before_the_tick_keeps_the_first() {
        let mut latch = PointerLatch::new();
        latch.press(HERE);
        latch.release(HERE);
        latch.press(Point::new(300.0, 20.0));
        latch.moved();
        latch.release(Point::new(300.0, 20.0));
        assert_eq!(latch.take_click(), Some(HERE));
        assert_eq!(latch.take_click(), None);
    }

    #[test]
    fn holding_the_pointer_down_clicks_once() {
        let mut latch = PointerLatch::new();
        latch.press(HERE);
        latch.release(HERE);
        assert!(latch.take_click().is_some());
        for _ in 0..10 {
            assert_eq!(latch.take_click(), None);
        }
    }
}
