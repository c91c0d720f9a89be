use super::traits::Button;
use crate::input::Buttons;
use embedded_hal::digital::InputPin;

/// Push button wired to ground with a pull-up, so pressed reads low.
pub struct GpioButton<P> {
    pin: P,
}

impl<P: InputPin> GpioButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> Button for GpioButton<P> {
    fn is_pressed(&mut self) -> bool {
        // A pin read error counts as released.
        self.pin.is_low().unwrap_or(false)
    }
}

/// The board's four buttons, S1 first.
pub struct ButtonBank<B> {
    buttons: [B; Buttons::COUNT],
}

impl<B: Button> ButtonBank<B> {
    pub fn new(buttons: [B; Buttons::COUNT]) -> Self {
        Self { buttons }
    }

    /// Current levels as a bitmask.
    pub fn read(&mut self) -> Buttons {
        let mut mask = Buttons::NONE;
        for (i, button) in self.buttons.iter_mut().enumerate() {
            if button.is_pressed() {
                mask = mask | Buttons::from_index(i);
            }
        }
        mask
    }
}
