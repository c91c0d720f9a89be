//! Editable fields and dial-driven adjustment

/// One calendar field, in edit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Month,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
    ];

    /// Next field in the cycle Month -> Day -> Hour -> Minute -> Second -> Month.
    pub const fn next(self) -> Self {
        match self {
            Field::Month => Field::Day,
            Field::Day => Field::Hour,
            Field::Hour => Field::Minute,
            Field::Minute => Field::Second,
            Field::Second => Field::Month,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Range covered by a full dial sweep.
    ///
    /// Half a sweep is +-6 months, +-half the month, +-12 hours and +-30
    /// minutes or seconds. `bounds` is the current day count of the month.
    pub const fn dial_span(self, bounds: u8) -> u8 {
        match self {
            Field::Month => 12,
            Field::Day => bounds,
            Field::Hour => 24,
            Field::Minute | Field::Second => 60,
        }
    }

    /// True for fields shown on the date line, false for the time line.
    pub const fn is_date(self) -> bool {
        matches!(self, Field::Month | Field::Day)
    }
}

/// Set of fields the user may edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSet(u8);

impl FieldSet {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0x1F);
    pub const DATE: Self = Self::NONE.with(Field::Month).with(Field::Day);
    pub const TIME: Self = Self::NONE
        .with(Field::Hour)
        .with(Field::Minute)
        .with(Field::Second);

    pub const fn with(self, field: Field) -> Self {
        Self(self.0 | field.bit())
    }

    pub const fn without(self, field: Field) -> Self {
        Self(self.0 & !field.bit())
    }

    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// First editable field in edit order.
    pub fn first(self) -> Option<Field> {
        Field::ALL.into_iter().find(|f| self.contains(*f))
    }

    /// Next editable field after `field`, wrapping around.
    ///
    /// Returns `field` itself if it is the only member.
    pub fn after(self, field: Field) -> Option<Field> {
        let mut next = field.next();
        for _ in 0..Field::ALL.len() {
            if self.contains(next) {
                return Some(next);
            }
            next = next.next();
        }
        None
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Maps raw potentiometer readings onto field offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialScale {
    full_scale: u16,
    half_scale: u16,
}

impl DialScale {
    /// 12 bit ADC.
    pub const ADC12: Self = Self::new(4095);

    pub const fn new(full_scale: u16) -> Self {
        let half_scale = (full_scale / 2) + 1;
        Self {
            full_scale,
            half_scale,
        }
    }

    pub const fn full_scale(&self) -> u16 {
        self.full_scale
    }

    pub const fn clamp(&self, raw: u16) -> u16 {
        if raw > self.full_scale {
            self.full_scale
        } else {
            raw
        }
    }

    /// Signed distance of the dial from its baseline.
    pub const fn delta(&self, raw: u16, baseline: u16) -> i32 {
        self.clamp(raw) as i32 - self.clamp(baseline) as i32
    }

    /// Field offset for a dial movement.
    ///
    /// `delta * span / (2 * half_scale)` rounded half away from zero.
    pub const fn offset(&self, delta: i32, span: u8) -> i64 {
        let num = delta as i64 * span as i64;
        let den = 2 * self.half_scale as i64;
        if num >= 0 {
            (num + den / 2) / den
        } else {
            -((-num + den / 2) / den)
        }
    }

    /// Apply a dial movement to a field value and wrap into `[0, bounds)`.
    pub const fn adjust(&self, field: Field, dial_delta: i32, current_value: u8, bounds: u8) -> u8 {
        if bounds == 0 {
            return 0;
        }
        let offset = self.offset(dial_delta, field.dial_span(bounds));
        (current_value as i64 + offset).rem_euclid(bounds as i64) as u8
    }
}

impl Default for DialScale {
    fn default() -> Self {
        Self::ADC12
    }
}

/// [`DialScale::adjust`] for the 12 bit dial.
pub const fn adjust(field: Field, dial_delta: i32, current_value: u8, field_bounds: u8) -> u8 {
    DialScale::ADC12.adjust(field, dial_delta, current_value, field_bounds)
}
