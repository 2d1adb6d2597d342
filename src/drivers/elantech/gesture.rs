use super::{event::Buttons, MAX_FINGERS, TAP_TO_CLICK_DISTANCE};

/// Absolute touchpad position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Tap tracking state for one finger slot
#[derive(Clone, Copy, Debug)]
struct FingerTrack {
    /// Where the finger first touched down
    start: Option<Point>,
    /// Whether the finger has stayed within the tap distance of its start
    in_range: bool,
}

impl Default for FingerTrack {
    fn default() -> Self {
        Self {
            start: None,
            in_range: true,
        }
    }
}

/// Tracks finger contacts across packets to produce relative motion and
/// synthesize tap-to-click. A contact that stays within the tap distance of
/// where it started produces a click when every finger is lifted: left for
/// one finger, right for two. There is no timeout, so a long stationary hold
/// still counts as a tap.
#[derive(Clone, Debug)]
pub struct GestureState {
    slots: [FingerTrack; MAX_FINGERS],
    /// Whether the current contact sequence may still produce a click
    tap_to_click: bool,
    /// Whether tap-to-click is enabled at all
    enabled: bool,
    distance: i32,
    /// Finger count of the last decoded packet
    last_fingers: u8,
    /// Last single finger position, used to compute relative motion
    last_point: Option<Point>,
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new(true, TAP_TO_CLICK_DISTANCE)
    }
}

impl GestureState {
    pub fn new(enabled: bool, distance: u32) -> Self {
        Self {
            slots: [FingerTrack::default(); MAX_FINGERS],
            tap_to_click: true,
            enabled,
            distance: distance.min(i32::MAX as u32) as i32,
            last_fingers: 0,
            last_point: None,
        }
    }

    /// Record a single finger position. Returns the movement since the
    /// previous position if there was one.
    pub fn motion(&mut self, point: Point) -> Option<(i32, i32)> {
        let delta = self
            .last_point
            .map(|last| (point.x - last.x, point.y - last.y));
        self.last_point = Some(point);
        delta
    }

    /// Update the tap state of the given finger slot with a new position.
    /// The first position of a contact becomes its start point. Moving
    /// further than the tap distance in either axis disqualifies the whole
    /// contact sequence from producing a click.
    pub fn track(&mut self, slot: usize, point: Point) {
        let distance = self.distance;
        let Some(track) = self.slots.get_mut(slot) else {
            log::warn!("Ignoring finger slot {slot}");
            return;
        };

        let Some(start) = track.start else {
            track.start = Some(point);
            log::trace!("Start point {slot}: x {}, y {}", point.x, point.y);
            return;
        };

        let x_diff = point.x - start.x;
        let y_diff = point.y - start.y;
        log::trace!("Slot {slot} x_diff {x_diff}, y_diff {y_diff}");
        if x_diff.abs() > distance || y_diff.abs() > distance {
            if track.in_range {
                log::trace!("Slot {slot} moved out of tap range");
            }
            track.in_range = false;
        }
        if !track.in_range {
            self.tap_to_click = false;
        }
    }

    /// All fingers were lifted. Returns the synthesized tap button, if any,
    /// and resets tracking for the next contact.
    pub fn release(&mut self) -> Buttons {
        let mut buttons = Buttons::default();
        if self.enabled && self.tap_to_click {
            match self.last_fingers {
                1 => buttons |= Buttons::LEFT,
                2 => buttons |= Buttons::RIGHT,
                _ => (),
            }
            if !buttons.is_empty() {
                log::debug!("Tap to click with {} finger(s)", self.last_fingers);
            }
        }

        self.last_point = None;
        self.slots = [FingerTrack::default(); MAX_FINGERS];
        self.tap_to_click = true;
        buttons
    }

    /// Record the finger count of the packet that was just decoded
    pub fn set_fingers(&mut self, fingers: u8) {
        self.last_fingers = fingers;
    }

    pub fn last_fingers(&self) -> u8 {
        self.last_fingers
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Whether releasing now would produce a click
    pub fn is_tap_eligible(&self) -> bool {
        self.enabled && self.tap_to_click
    }

    pub fn start_point(&self, slot: usize) -> Option<Point> {
        self.slots.get(slot).and_then(|track| track.start)
    }

    pub fn in_range(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|track| track.in_range)
    }
}
