//! Text for the display
//!
//! Everything here produces fixed-width strings; drawing them is up to the
//! board support code.

use core::fmt::Write;
use core::ops::BitOr;

use heapless::String;

use crate::calendar::{CalendarFields, month_abbrev};
use crate::error::HardwareFault;
use crate::field::Field;
use crate::temperature::celsius_to_fahrenheit;

/// `"Mon DD"`
pub type DateText = String<6>;
/// `"HH:MM:SS"`
pub type TimeText = String<8>;
/// `"ddd.d C"`
pub type TemperatureText = String<7>;

pub fn date_text(fields: &CalendarFields) -> DateText {
    let mut text = DateText::new();
    // Fits by construction: 3 letters, a space and two digits.
    let _ = write!(text, "{} {:02}", month_abbrev(fields.month), fields.day % 100);
    text
}

pub fn time_text(fields: &CalendarFields) -> TimeText {
    let mut text = TimeText::new();
    let _ = write!(
        text,
        "{:02}:{:02}:{:02}",
        fields.hour % 100,
        fields.minute % 100,
        fields.second % 100
    );
    text
}

/// Three integer digits, one decimal and the unit letter.
///
/// Values that do not fit are shown as dashes.
pub fn temperature_text(value: f32, unit: char) -> TemperatureText {
    let mut text = TemperatureText::new();
    if (-99.9..=999.9).contains(&value) && write!(text, "{value:05.1} {unit}").is_ok() {
        return text;
    }
    text.clear();
    let _ = write!(text, "---.- {unit}");
    text
}

/// Marker drawn under the date or time line for the field being edited.
pub const fn underline(field: Field) -> &'static str {
    match field {
        Field::Month => "___   ",
        Field::Day => "    __",
        Field::Hour => "__      ",
        Field::Minute => "   __   ",
        Field::Second => "      __",
    }
}

/// Parts of the screen that may be shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Elements(u8);

impl Elements {
    pub const NONE: Self = Self(0);
    pub const DATE: Self = Self(1 << 0);
    pub const TIME: Self = Self(1 << 1);
    pub const CELSIUS: Self = Self(1 << 2);
    pub const FAHRENHEIT: Self = Self(1 << 3);
    pub const ALL: Self = Self(0x0F);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Elements {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// How HOME arranges its content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layout {
    /// Date, time and both temperatures at once.
    #[default]
    All,
    /// One element at a time, each for three seconds.
    Carousel,
}

/// Seconds each carousel element stays on screen.
const CAROUSEL_STEP: u64 = 3;

impl Layout {
    /// Elements to draw. Editing always shows just date and time.
    pub fn visible(self, editing: bool, total_seconds: u64) -> Elements {
        if editing {
            return Elements::DATE | Elements::TIME;
        }
        match self {
            Layout::All => Elements::ALL,
            Layout::Carousel => match (total_seconds / CAROUSEL_STEP) % 4 {
                0 => Elements::DATE,
                1 => Elements::TIME,
                2 => Elements::CELSIUS,
                _ => Elements::FAHRENHEIT,
            },
        }
    }
}

/// Complete screen content for one refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub date: DateText,
    pub time: TimeText,
    pub celsius: Option<TemperatureText>,
    pub fahrenheit: Option<TemperatureText>,
    /// Field currently being edited, drawn underlined.
    pub editing: Option<Field>,
    pub elements: Elements,
    pub fault: Option<HardwareFault>,
}

impl Frame {
    pub fn new(
        fields: &CalendarFields,
        editing: Option<Field>,
        temperature: Option<f32>,
        elements: Elements,
    ) -> Self {
        Self {
            date: date_text(fields),
            time: time_text(fields),
            celsius: temperature.map(|c| temperature_text(c, 'C')),
            fahrenheit: temperature.map(|c| temperature_text(celsius_to_fahrenheit(c), 'F')),
            editing,
            elements,
            fault: None,
        }
    }

    pub fn with_fault(mut self, fault: Option<HardwareFault>) -> Self {
        self.fault = fault;
        self
    }

    /// Underline marker and whether it belongs to the date line.
    pub fn underline(&self) -> Option<(&'static str, bool)> {
        self.editing.map(|f| (underline(f), f.is_date()))
    }

    pub fn shows(&self, element: Elements) -> bool {
        self.elements.contains(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_and_time_are_fixed_width() {
        let fields = CalendarFields::new(1, 0, 0, 0, 0);
        assert_eq!(date_text(&fields).as_str(), "Feb 00");
        assert_eq!(time_text(&fields).as_str(), "00:00:00");

        let fields = CalendarFields::new(11, 30, 23, 59, 9);
        assert_eq!(date_text(&fields).as_str(), "Dec 30");
        assert_eq!(time_text(&fields).as_str(), "23:59:09");
    }

    #[test]
    fn garbage_fields_still_fit() {
        let fields = CalendarFields::new(200, 250, 255, 255, 255);
        assert_eq!(date_text(&fields).as_str(), "??? 50");
        assert_eq!(time_text(&fields).as_str(), "55:55:55");
    }

    #[test]
    fn temperature_formatting() {
        assert_eq!(temperature_text(25.34, 'C').as_str(), "025.3 C");
        assert_eq!(temperature_text(77.6, 'F').as_str(), "077.6 F");
        assert_eq!(temperature_text(100.0, 'F').as_str(), "100.0 F");
        assert_eq!(temperature_text(-5.0, 'C').as_str(), "-05.0 C");
        assert_eq!(temperature_text(1234.0, 'C').as_str(), "---.- C");
        assert_eq!(temperature_text(f32::NAN, 'C').as_str(), "---.- C");
    }

    #[test]
    fn underline_markers_line_up() {
        assert_eq!(underline(Field::Month).len(), 6);
        assert_eq!(underline(Field::Day).len(), 6);
        for f in [Field::Hour, Field::Minute, Field::Second] {
            assert_eq!(underline(f).len(), 8);
        }
        assert_eq!(&"Feb 03"[4..6], "03");
        assert_eq!(underline(Field::Day).find('_'), Some(4));
        assert_eq!(underline(Field::Minute).find('_'), Some(3));
        assert_eq!(underline(Field::Second).find('_'), Some(6));
    }

    #[test]
    fn all_layout() {
        assert_eq!(Layout::All.visible(false, 7), Elements::ALL);
        let editing = Layout::All.visible(true, 7);
        assert!(editing.contains(Elements::DATE | Elements::TIME));
        assert!(!editing.contains(Elements::CELSIUS));
    }

    #[test]
    fn carousel_rotates_every_three_seconds() {
        let layout = Layout::Carousel;
        let seen: Vec<Elements> = (0..12).map(|s| layout.visible(false, s)).collect();
        assert_eq!(&seen[0..3], &[Elements::DATE; 3]);
        assert_eq!(&seen[3..6], &[Elements::TIME; 3]);
        assert_eq!(&seen[6..9], &[Elements::CELSIUS; 3]);
        assert_eq!(&seen[9..12], &[Elements::FAHRENHEIT; 3]);
        assert_eq!(layout.visible(false, 12), Elements::DATE);
        assert_eq!(layout.visible(true, 6), Elements::DATE | Elements::TIME);
    }

    #[test]
    fn frame_carries_everything() {
        let fields = CalendarFields::new(4, 12, 23, 59, 59);
        let frame = Frame::new(&fields, Some(Field::Day), Some(25.0), Elements::ALL);
        assert_eq!(frame.date.as_str(), "May 12");
        assert_eq!(frame.time.as_str(), "23:59:59");
        assert_eq!(frame.celsius.as_deref(), Some("025.0 C"));
        assert_eq!(frame.fahrenheit.as_deref(), Some("077.0 F"));
        assert_eq!(frame.underline(), Some(("    __", true)));
        assert!(frame.shows(Elements::FAHRENHEIT));
        assert_eq!(frame.fault, None);

        let frame = Frame::new(&fields, None, None, Elements::DATE)
            .with_fault(Some(HardwareFault::AdcTimeout));
        assert_eq!(frame.celsius, None);
        assert_eq!(frame.underline(), None);
        assert!(!frame.shows(Elements::TIME));
        assert_eq!(frame.fault, Some(HardwareFault::AdcTimeout));
    }
}
