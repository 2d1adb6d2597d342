use std::{
    fmt::{Display, Formatter},
    ops::{BitOr, BitOrAssign},
    time::Instant,
};

/// Events that can be emitted by the Elantech touchpad
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Single finger movement
    Motion(PointerEvent),
    /// All fingers lifted. Carries any synthesized tap-to-click button.
    Release(PointerEvent),
}

impl Event {
    pub fn pointer(&self) -> &PointerEvent {
        match self {
            Event::Motion(pointer) | Event::Release(pointer) => pointer,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Motion(_) => "Motion",
            Event::Release(_) => "Release",
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let pointer = self.pointer();
        write!(
            f,
            "{} dx: {}, dy: {}, buttons: {}",
            self.name(),
            pointer.dx,
            pointer.dy,
            pointer.buttons
        )
    }
}

/// Relative pointer update
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub dx: i32,
    pub dy: i32,
    pub buttons: Buttons,
    pub timestamp: Instant,
}

/// Button bitmask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons(u8);

impl Buttons {
    pub const LEFT: Buttons = Buttons(0x01);
    pub const RIGHT: Buttons = Buttons(0x02);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Self) -> Self::Output {
        Buttons(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Display for Buttons {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let left = if self.contains(Buttons::LEFT) { "L" } else { "-" };
        let right = if self.contains(Buttons::RIGHT) { "R" } else { "-" };
        write!(f, "{left}{right}")
    }
}
