//! Push button decoding
//!
//! Raw button levels go through a per-button debounce counter, then an edge
//! detector so that a held button produces exactly one press. Presses are
//! finally mapped to engine actions depending on the current mode.

use core::ops::{BitAnd, BitOr};

/// Bitmask of the four board buttons, S1 in bit 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(u8);

impl Buttons {
    pub const COUNT: usize = 4;
    const MASK: u8 = 0x0F;

    pub const NONE: Self = Self(0);
    pub const S1: Self = Self(1 << 0);
    pub const S2: Self = Self(1 << 1);
    pub const S3: Self = Self(1 << 2);
    pub const S4: Self = Self(1 << 3);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Mask with button `index` (0-based) set.
    pub const fn from_index(index: usize) -> Self {
        if index < Self::COUNT {
            Self(1 << index)
        } else {
            Self::NONE
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any button of `other` is also set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Buttons {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// What a button press asks the engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Enter edit mode from HOME.
    Edit,
    /// Commit the current field and move to the next one.
    Advance,
    /// Commit and leave edit mode.
    Confirm,
}

/// Which buttons trigger which action.
///
/// The same button may serve several actions; the mode decides which one
/// applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMap {
    pub edit: Buttons,
    pub advance: Buttons,
    pub confirm: Buttons,
}

impl ButtonMap {
    /// Decode newly pressed buttons into an action.
    ///
    /// In HOME only the edit button is honoured. While editing, confirm wins
    /// over advance when both are pressed together.
    pub fn decode(&self, pressed: Buttons, editing: bool) -> Option<Action> {
        if !editing {
            return pressed.intersects(self.edit).then_some(Action::Edit);
        }
        if pressed.intersects(self.confirm) {
            Some(Action::Confirm)
        } else if pressed.intersects(self.advance) {
            Some(Action::Advance)
        } else {
            None
        }
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            edit: Buttons::S1,
            advance: Buttons::S2,
            confirm: Buttons::S4,
        }
    }
}

/// Integrating debouncer.
///
/// A button's reported level only changes after `LIMIT` consecutive samples
/// disagree with it.
pub struct Debounce<const LIMIT: u8> {
    count: [u8; Buttons::COUNT],
    stable: Buttons,
}

impl<const LIMIT: u8> Debounce<LIMIT> {
    pub const fn new() -> Self {
        Self {
            count: [0; Buttons::COUNT],
            stable: Buttons::NONE,
        }
    }

    /// Feed one raw sample, returns the debounced levels.
    pub fn update(&mut self, raw: Buttons) -> Buttons {
        for (i, count) in self.count.iter_mut().enumerate() {
            let bit = Buttons::from_index(i);
            if raw.intersects(bit) == self.stable.intersects(bit) {
                *count = 0;
                continue;
            }
            *count = count.saturating_add(1);
            if *count >= LIMIT {
                self.stable = Buttons::from_bits(self.stable.bits() ^ bit.bits());
                *count = 0;
            }
        }
        self.stable
    }

    pub fn level(&self) -> Buttons {
        self.stable
    }
}

impl<const LIMIT: u8> Default for Debounce<LIMIT> {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns button levels into press events.
#[derive(Default)]
pub struct EdgeDetector {
    prev: Buttons,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self {
            prev: Buttons::NONE,
        }
    }

    /// Buttons that are down now and were up at the previous call.
    pub fn update(&mut self, level: Buttons) -> Buttons {
        let pressed = Buttons::from_bits(level.bits() & !self.prev.bits());
        self.prev = level;
        pressed
    }
}
