//! Foreground loop
//!
//! One [`Controller::poll`] call per pass of the main loop: debounce the
//! buttons, run the edit state machine, feed the temperature average and
//! build a [`Frame`] whenever the screen needs to change.

use crate::calendar::CalendarFields;
use crate::clock::SharedClock;
use crate::config::EngineConfig;
use crate::edit::{Engine, Mode};
use crate::error::{Faults, HardwareFault};
use crate::input::{Buttons, Debounce, EdgeDetector};
use crate::presenter::Frame;
use crate::temperature::{Calibration, TemperatureAverager};

/// Samples a button must be stable for before it counts.
pub const DEBOUNCE_SAMPLES: u8 = 3;

/// Samples in the temperature average.
pub const TEMPERATURE_WINDOW: usize = 36;

/// Everything read from the board in one loop pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    /// Raw (not debounced) button levels.
    pub buttons: Buttons,
    /// Potentiometer reading.
    pub dial: u16,
    /// Raw temperature sensor reading, if one was taken this pass.
    pub temperature: Option<u16>,
}

pub struct Controller {
    engine: Engine,
    debounce: Debounce<DEBOUNCE_SAMPLES>,
    edges: EdgeDetector,
    temperature: TemperatureAverager<TEMPERATURE_WINDOW>,
    average: Option<f32>,
    faults: Faults,
    last_shown: Option<(Mode, CalendarFields)>,
}

impl Controller {
    pub fn new(config: EngineConfig, calibration: Calibration) -> Self {
        Self {
            engine: Engine::new(config),
            debounce: Debounce::new(),
            edges: EdgeDetector::new(),
            temperature: TemperatureAverager::new(calibration),
            average: None,
            faults: Faults::NONE,
            last_shown: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    /// Average temperature in Celsius, once a sample arrived.
    pub fn temperature(&self) -> Option<f32> {
        self.average
    }

    pub fn faults(&self) -> Faults {
        self.faults
    }

    /// Record a peripheral failure.
    ///
    /// A running edit is abandoned since the dial can no longer be trusted.
    pub fn report_fault(&mut self, clock: &SharedClock, fault: HardwareFault) {
        if !self.faults.contains(fault) {
            warn!("hardware fault: {:?}", fault);
            self.faults = self.faults.with(fault);
            clock.request_redraw();
        }
        if fault == HardwareFault::AdcTimeout {
            self.engine.cancel(clock);
        }
    }

    /// Forget one fault once its peripheral works again.
    pub fn clear_fault(&mut self, clock: &SharedClock, fault: HardwareFault) {
        if self.faults.contains(fault) {
            info!("hardware fault cleared: {:?}", fault);
            self.faults = self.faults.without(fault);
            clock.request_redraw();
        }
    }

    /// One pass of the foreground loop.
    ///
    /// Returns a frame when the display needs to be redrawn.
    pub fn poll(&mut self, clock: &SharedClock, inputs: &Inputs) -> Option<Frame> {
        let level = self.debounce.update(inputs.buttons);
        let pressed = self.edges.update(level);
        if !pressed.is_empty() {
            if let Some(action) = self.engine.handle(clock, pressed, inputs.dial) {
                debug!("action {:?} -> {:?}", action, self.engine.mode());
            }
        }

        // The average only advances in HOME; edit mode shows no temperature.
        if let Some(raw) = inputs.temperature {
            if !self.engine.is_editing() {
                self.average = Some(self.temperature.push(raw));
            }
        }

        let mode = self.engine.mode();
        let fields = self.engine.fields(clock, inputs.dial);
        let ticked = clock.take_redraw();
        let changed = self.last_shown != Some((mode, fields));
        if !ticked && !changed {
            return None;
        }
        self.last_shown = Some((mode, fields));

        let editing = match mode {
            Mode::Edit(field) => Some(field),
            Mode::Home => None,
        };
        let elements = self
            .engine
            .config()
            .layout
            .visible(editing.is_some(), clock.now());
        let frame = Frame::new(&fields, editing, self.average, elements)
            .with_fault(self.faults.first());
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::compose;
    use crate::field::Field;
    use crate::presenter::{Elements, Layout};

    fn controller() -> Controller {
        Controller::new(
            EngineConfig::default(),
            Calibration::new(2000, 2550).unwrap(),
        )
    }

    fn clock() -> SharedClock {
        SharedClock::new(compose(&CalendarFields::new(4, 12, 23, 59, 59)))
    }

    fn idle(dial: u16) -> Inputs {
        Inputs {
            buttons: Buttons::NONE,
            dial,
            temperature: None,
        }
    }

    /// Hold a button long enough to pass the debouncer, then release it.
    fn press(ctl: &mut Controller, clock: &SharedClock, button: Buttons, dial: u16) {
        let held = Inputs {
            buttons: button,
            ..idle(dial)
        };
        for _ in 0..DEBOUNCE_SAMPLES {
            ctl.poll(clock, &held);
        }
        for _ in 0..DEBOUNCE_SAMPLES {
            ctl.poll(clock, &idle(dial));
        }
    }

    #[test]
    fn first_poll_draws_home_screen() {
        let clock = clock();
        let mut ctl = controller();
        let inputs = Inputs {
            temperature: Some(2050),
            ..idle(2048)
        };
        let frame = ctl.poll(&clock, &inputs).unwrap();
        assert_eq!(frame.date.as_str(), "May 12");
        assert_eq!(frame.time.as_str(), "23:59:59");
        assert_eq!(frame.celsius.as_deref(), Some("035.0 C"));
        assert_eq!(frame.editing, None);
        assert_eq!(frame.elements, Elements::ALL);

        // Nothing changed, nothing to draw.
        assert_eq!(ctl.poll(&clock, &idle(2048)), None);

        clock.tick();
        let frame = ctl.poll(&clock, &idle(2048)).unwrap();
        assert_eq!(frame.date.as_str(), "May 13");
        assert_eq!(frame.time.as_str(), "00:00:00");
    }

    #[test]
    fn full_edit_interaction() {
        let clock = clock();
        let mut ctl = controller();
        ctl.poll(&clock, &idle(2048));

        press(&mut ctl, &clock, Buttons::S1, 2048);
        assert_eq!(ctl.mode(), Mode::Edit(Field::Month));
        assert!(clock.is_frozen());

        // Turning the dial redraws immediately, even without a tick.
        let frame = ctl.poll(&clock, &idle(2048 + 342)).unwrap();
        assert_eq!(frame.date.as_str(), "Jun 12");
        assert_eq!(frame.underline(), Some(("___   ", true)));
        assert_eq!(frame.celsius, None);
        assert!(!frame.shows(Elements::CELSIUS));

        press(&mut ctl, &clock, Buttons::S2, 2048 + 342);
        assert_eq!(ctl.mode(), Mode::Edit(Field::Day));

        for _ in 0..5 {
            clock.tick();
        }
        press(&mut ctl, &clock, Buttons::S4, 2048 + 342);
        assert_eq!(ctl.mode(), Mode::Home);
        assert!(!clock.is_frozen());
        assert_eq!(clock.fields(), CalendarFields::new(5, 12, 23, 59, 59));
    }

    #[test]
    fn temperature_only_sampled_at_home() {
        let clock = clock();
        let mut ctl = controller();
        let sample = |raw| Inputs {
            temperature: Some(raw),
            ..idle(0)
        };
        ctl.poll(&clock, &sample(2000));
        assert_eq!(ctl.temperature(), Some(30.0));

        press(&mut ctl, &clock, Buttons::S1, 0);
        ctl.poll(&clock, &sample(2550));
        assert_eq!(ctl.temperature(), Some(30.0));
    }

    #[test]
    fn bouncing_button_is_ignored() {
        let clock = clock();
        let mut ctl = controller();
        let held = Inputs {
            buttons: Buttons::S1,
            ..idle(0)
        };
        for _ in 0..10 {
            ctl.poll(&clock, &held);
            ctl.poll(&clock, &idle(0));
        }
        assert_eq!(ctl.mode(), Mode::Home);
    }

    #[test]
    fn adc_fault_abandons_edit() {
        let clock = clock();
        let start = clock.now();
        let mut ctl = controller();
        press(&mut ctl, &clock, Buttons::S1, 0);
        assert!(ctl.engine().is_editing());

        ctl.report_fault(&clock, HardwareFault::AdcTimeout);
        assert_eq!(ctl.mode(), Mode::Home);
        assert_eq!(clock.now(), start);
        let frame = ctl.poll(&clock, &idle(0)).unwrap();
        assert_eq!(frame.fault, Some(HardwareFault::AdcTimeout));

        ctl.clear_fault(&clock, HardwareFault::AdcTimeout);
        assert!(ctl.faults().is_empty());
        assert_eq!(ctl.poll(&clock, &idle(0)).unwrap().fault, None);
    }

    #[test]
    fn repeated_fault_reports_do_not_redraw() {
        let clock = clock();
        let mut ctl = controller();
        ctl.report_fault(&clock, HardwareFault::AdcTimeout);
        assert!(ctl.poll(&clock, &idle(0)).is_some());

        ctl.report_fault(&clock, HardwareFault::AdcTimeout);
        assert_eq!(ctl.poll(&clock, &idle(0)), None);
    }

    #[test]
    fn adc_recovery_keeps_display_fault() {
        let clock = clock();
        let mut ctl = controller();
        ctl.report_fault(&clock, HardwareFault::Display);
        ctl.report_fault(&clock, HardwareFault::AdcTimeout);
        let frame = ctl.poll(&clock, &idle(0)).unwrap();
        assert_eq!(frame.fault, Some(HardwareFault::AdcTimeout));

        ctl.clear_fault(&clock, HardwareFault::AdcTimeout);
        assert!(ctl.faults().contains(HardwareFault::Display));
        let frame = ctl.poll(&clock, &idle(0)).unwrap();
        assert_eq!(frame.fault, Some(HardwareFault::Display));

        // Clearing a fault that is not active changes nothing.
        ctl.clear_fault(&clock, HardwareFault::AdcTimeout);
        assert_eq!(ctl.poll(&clock, &idle(0)), None);
    }

    #[test]
    fn carousel_layout_at_home() {
        let clock = SharedClock::new(6);
        let mut ctl = Controller::new(
            EngineConfig::default().with_layout(Layout::Carousel),
            Calibration::new(2000, 2550).unwrap(),
        );
        let frame = ctl.poll(&clock, &idle(0)).unwrap();
        assert_eq!(frame.elements, Elements::CELSIUS);
    }
}
