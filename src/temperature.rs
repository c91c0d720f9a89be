//! Die temperature conversion and rolling average

use heapless::HistoryBuffer;

use crate::error::Error;

/// Two-point calibration of the temperature sensor.
///
/// Built from the raw ADC readings at 30 and 85 degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    raw_30c: u16,
    degrees_per_count: f32,
}

impl Calibration {
    pub fn new(raw_30c: u16, raw_85c: u16) -> Result<Self, Error> {
        if raw_30c == raw_85c {
            return Err(Error::InvalidCalibration { raw_30c, raw_85c });
        }
        let degrees_per_count = (85.0 - 30.0) / (raw_85c as f32 - raw_30c as f32);
        Ok(Self {
            raw_30c,
            degrees_per_count,
        })
    }

    pub fn to_celsius(&self, raw: u16) -> f32 {
        (raw as f32 - self.raw_30c as f32) * self.degrees_per_count + 30.0
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Average over the last `N` calibrated samples.
pub struct TemperatureAverager<const N: usize> {
    calibration: Calibration,
    samples: HistoryBuffer<f32, N>,
}

impl<const N: usize> TemperatureAverager<N> {
    pub fn new(calibration: Calibration) -> Self {
        const { assert!(N > 0, "averaging window must not be empty") };
        Self {
            calibration,
            samples: HistoryBuffer::new(),
        }
    }

    /// Add a raw reading and return the new average in Celsius.
    ///
    /// The first reading fills the whole window. Afterwards the oldest
    /// sample is overwritten.
    pub fn push(&mut self, raw: u16) -> f32 {
        let celsius = self.calibration.to_celsius(raw);
        if self.is_empty() {
            for _ in 0..N {
                self.samples.write(celsius);
            }
        } else {
            self.samples.write(celsius);
        }
        trace!("temperature sample {} -> {}", raw, celsius);
        self.sum() / self.samples.len() as f32
    }

    /// Current average, `None` before the first sample.
    pub fn average(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum() / self.samples.len() as f32)
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    // Full summation, no running total.
    fn sum(&self) -> f32 {
        self.samples.as_slice().iter().sum()
    }
}
