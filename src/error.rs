use core::fmt;

/// Library errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The two calibration points of the temperature sensor coincide.
    InvalidCalibration { raw_30c: u16, raw_85c: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCalibration { raw_30c, raw_85c } => write!(
                f,
                "invalid temperature calibration: 30C={raw_30c} 85C={raw_85c}"
            ),
        }
    }
}

impl core::error::Error for Error {}

/// Peripheral failures reported by the board support code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareFault {
    /// An ADC conversion did not finish within the retry budget.
    AdcTimeout,
    /// The display did not accept a frame.
    Display,
}

impl HardwareFault {
    pub const ALL: [HardwareFault; 2] = [HardwareFault::AdcTimeout, HardwareFault::Display];

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Short text that fits on one display line.
    pub const fn label(self) -> &'static str {
        match self {
            HardwareFault::AdcTimeout => "ADC FAULT",
            HardwareFault::Display => "LCD FAULT",
        }
    }
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareFault::AdcTimeout => f.write_str("ADC conversion timed out"),
            HardwareFault::Display => f.write_str("display write failed"),
        }
    }
}

impl core::error::Error for HardwareFault {}

/// Set of active hardware faults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Faults(u8);

impl Faults {
    pub const NONE: Self = Self(0);

    pub const fn with(self, fault: HardwareFault) -> Self {
        Self(self.0 | fault.bit())
    }

    pub const fn without(self, fault: HardwareFault) -> Self {
        Self(self.0 & !fault.bit())
    }

    pub const fn contains(self, fault: HardwareFault) -> bool {
        self.0 & fault.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The fault to show when several are active, ADC first.
    pub fn first(self) -> Option<HardwareFault> {
        HardwareFault::ALL.into_iter().find(|f| self.contains(*f))
    }
}
