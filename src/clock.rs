//! Seconds counter shared between the tick and the foreground loop
//!
//! The tick may run in interrupt context and only touches the counter and the
//! flags. Every access goes through a critical section so that multi-step
//! updates (freeze and snapshot, commit and resume) are atomic with respect
//! to the tick.

use core::cell::Cell;

use critical_section::Mutex;

use crate::calendar::{self, CalendarFields};

/// Counter plus the flags raised by the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Seconds since January 1st 00:00:00, always below one year.
    pub total_seconds: u64,
    /// Set while a field edit is in progress. Ticks do not count then.
    pub frozen: bool,
    /// A new second elapsed or the screen content changed.
    pub redraw: bool,
    /// A temperature sample should be taken.
    pub sample_due: bool,
}

impl ClockState {
    pub const fn new(total_seconds: u64) -> Self {
        Self {
            total_seconds: calendar::normalize(total_seconds),
            frozen: false,
            redraw: true,
            sample_due: true,
        }
    }

    /// One tick of the 1 Hz time base.
    pub fn tick(&mut self) {
        if !self.frozen {
            self.total_seconds = calendar::normalize(self.total_seconds + 1);
        }
        self.redraw = true;
        self.sample_due = true;
    }
}

/// Interrupt safe owner of the [`ClockState`].
pub struct SharedClock {
    state: Mutex<Cell<ClockState>>,
}

impl SharedClock {
    pub const fn new(total_seconds: u64) -> Self {
        Self {
            state: Mutex::new(Cell::new(ClockState::new(total_seconds))),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut ClockState) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let ret = f(&mut state);
            cell.set(state);
            ret
        })
    }

    /// Copy of the whole state.
    pub fn snapshot(&self) -> ClockState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Tick handler entry point.
    pub fn tick(&self) {
        self.update(|s| s.tick());
    }

    pub fn now(&self) -> u64 {
        self.snapshot().total_seconds
    }

    pub fn fields(&self) -> CalendarFields {
        calendar::decompose(self.now())
    }

    pub fn is_frozen(&self) -> bool {
        self.snapshot().frozen
    }

    /// Overwrite the counter, e.g. at power-up.
    pub fn set(&self, total_seconds: u64) {
        self.update(|s| {
            s.total_seconds = calendar::normalize(total_seconds);
            s.redraw = true;
        });
    }

    /// Stop counting and return the counter value at that instant.
    pub fn freeze(&self) -> u64 {
        self.update(|s| {
            s.frozen = true;
            s.redraw = true;
            s.total_seconds
        })
    }

    /// Store an edited counter value and resume counting.
    pub fn commit(&self, total_seconds: u64) {
        self.update(|s| {
            s.total_seconds = calendar::normalize(total_seconds);
            s.frozen = false;
            s.redraw = true;
        });
    }

    /// Resume counting without changing the counter.
    pub fn thaw(&self) {
        self.update(|s| {
            s.frozen = false;
            s.redraw = true;
        });
    }

    pub fn request_redraw(&self) {
        self.update(|s| s.redraw = true);
    }

    /// Consume the redraw flag.
    pub fn take_redraw(&self) -> bool {
        self.update(|s| core::mem::take(&mut s.redraw))
    }

    /// Consume the sample flag.
    pub fn take_sample_due(&self) -> bool {
        self.update(|s| core::mem::take(&mut s.sample_due))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SECONDS_PER_YEAR;

    #[test]
    fn tick_counts_and_flags() {
        let clock = SharedClock::new(10);
        assert!(clock.take_redraw());
        assert!(clock.take_sample_due());
        assert!(!clock.take_redraw());

        clock.tick();
        assert_eq!(clock.now(), 11);
        assert!(clock.take_redraw());
        assert!(!clock.take_redraw());
        assert!(clock.take_sample_due());
    }

    #[test]
    fn frozen_clock_does_not_count() {
        let clock = SharedClock::new(500);
        assert_eq!(clock.freeze(), 500);
        assert!(clock.is_frozen());
        for _ in 0..100 {
            clock.tick();
        }
        assert_eq!(clock.now(), 500);
        // Ticks still request redraws while frozen.
        assert!(clock.take_redraw());

        clock.commit(42);
        assert!(!clock.is_frozen());
        clock.tick();
        assert_eq!(clock.now(), 43);
    }

    #[test]
    fn thaw_keeps_counter() {
        let clock = SharedClock::new(7);
        clock.freeze();
        clock.tick();
        clock.thaw();
        assert_eq!(clock.now(), 7);
        clock.tick();
        assert_eq!(clock.now(), 8);
    }

    #[test]
    fn year_rolls_over() {
        let clock = SharedClock::new(SECONDS_PER_YEAR - 1);
        assert_eq!(clock.fields(), CalendarFields::new(11, 30, 23, 59, 59));
        clock.tick();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.fields(), CalendarFields::default());
    }

    #[test]
    fn out_of_range_values_are_normalized() {
        let clock = SharedClock::new(SECONDS_PER_YEAR + 5);
        assert_eq!(clock.now(), 5);
        clock.set(u64::MAX);
        assert!(clock.now() < SECONDS_PER_YEAR);
        clock.commit(2 * SECONDS_PER_YEAR + 1);
        assert_eq!(clock.now(), 1);
    }

    #[test]
    fn tick_from_another_thread() {
        static CLOCK: SharedClock = SharedClock::new(0);
        let handle = std::thread::spawn(|| {
            for _ in 0..1000 {
                CLOCK.tick();
            }
        });
        for _ in 0..1000 {
            let _ = CLOCK.take_redraw();
        }
        handle.join().unwrap();
        assert_eq!(CLOCK.now(), 1000);
    }
}
