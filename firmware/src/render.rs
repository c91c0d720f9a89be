//! Drawing a [`Frame`] on the 128x64 OLED

use calendar_clock::presenter::{Elements, Frame};
use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_8X13, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

const CENTER_X: i32 = 64;

// Top edge of each text line.
const DATE_Y: i32 = 2;
const TIME_Y: i32 = 17;
const CELSIUS_Y: i32 = 40;
const FAHRENHEIT_Y: i32 = 52;

// Underline markers are drawn slightly below the line they belong to.
const DATE_UNDERLINE_Y: i32 = DATE_Y + 2;
const TIME_UNDERLINE_Y: i32 = TIME_Y + 3;

type Style = MonoTextStyle<'static, BinaryColor>;

fn line(text: &str, y: i32, style: Style) -> Text<'_, Style> {
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, Point::new(CENTER_X, y), style, centered)
}

/// Draw everything the frame asks for.
///
/// `cursor_visible` is the blink phase of the edit underline.
pub fn draw_frame<D>(target: &mut D, frame: &Frame, cursor_visible: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let medium = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
    let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);

    if frame.shows(Elements::DATE) {
        line(&frame.date, DATE_Y, medium).draw(target)?;
    }
    if frame.shows(Elements::TIME) {
        line(&frame.time, TIME_Y, large).draw(target)?;
    }

    if cursor_visible {
        if let Some((marker, on_date_line)) = frame.underline() {
            if on_date_line {
                line(marker, DATE_UNDERLINE_Y, medium).draw(target)?;
            } else {
                line(marker, TIME_UNDERLINE_Y, large).draw(target)?;
            }
        }
    }

    if frame.shows(Elements::CELSIUS) {
        if let Some(celsius) = &frame.celsius {
            line(celsius, CELSIUS_Y, small).draw(target)?;
        }
    }

    // A fault takes the bottom line.
    if let Some(fault) = frame.fault {
        line(fault.label(), FAHRENHEIT_Y, small).draw(target)?;
    } else if frame.shows(Elements::FAHRENHEIT) {
        if let Some(fahrenheit) = &frame.fahrenheit {
            line(fahrenheit, FAHRENHEIT_Y, small).draw(target)?;
        }
    }

    Ok(())
}
