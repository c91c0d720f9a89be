use super::traits::Led;
use embedded_hal::digital::StatefulOutputPin;

/// LED driven low to light up, like PC13 on the Blue Pill.
pub struct GpioLed<P> {
    pin: P,
}

impl<P: StatefulOutputPin> GpioLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: StatefulOutputPin> Led for GpioLed<P> {
    fn on(&mut self) {
        let _ = self.pin.set_low();
    }

    fn off(&mut self) {
        let _ = self.pin.set_high();
    }

    fn toggle(&mut self) {
        let _ = self.pin.toggle();
    }
}
