//! Seconds-of-year <-> calendar field conversion
//!
//! The clock does not track a year. Time is a counter of seconds since
//! January 1st 00:00:00 that cycles every 365 days, and months follow the
//! fixed non-leap table below.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::field::Field;

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
pub const DAYS_PER_YEAR: u64 = 365;
pub const SECONDS_PER_YEAR: u64 = DAYS_PER_YEAR * SECONDS_PER_DAY;

/// Month lengths, January first. February is always 28 days.
const MONTH_DAYS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of days in a 0-based month, or 0 for an invalid month.
pub const fn days_in_month(month: u8) -> u8 {
    if month < 12 {
        MONTH_DAYS[month as usize]
    } else {
        0
    }
}

/// Three letter English abbreviation of a 0-based month.
pub fn month_abbrev(month: u8) -> &'static str {
    MONTH_ABBREV.get(month as usize).copied().unwrap_or("???")
}

/// Reduce an arbitrary counter value into the calendar cycle.
pub const fn normalize(total_seconds: u64) -> u64 {
    total_seconds % SECONDS_PER_YEAR
}

/// Calendar view of the seconds counter. All fields are 0-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarFields {
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarFields {
    pub const fn new(month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Take month, day and time of day from a chrono timestamp.
    ///
    /// The year is dropped. February 29th becomes February 28th since the
    /// calendar has no leap days.
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        let month = datetime.month0() as u8;
        let day = (datetime.day0() as u8).min(days_in_month(month) - 1);
        Self::new(
            month,
            day,
            datetime.hour() as u8,
            datetime.minute() as u8,
            datetime.second() as u8,
        )
    }

    pub const fn get(&self, field: Field) -> u8 {
        match field {
            Field::Month => self.month,
            Field::Day => self.day,
            Field::Hour => self.hour,
            Field::Minute => self.minute,
            Field::Second => self.second,
        }
    }

    /// Copy with one field replaced.
    ///
    /// Changing the month clamps the day to the new month's last day.
    pub fn with(mut self, field: Field, value: u8) -> Self {
        match field {
            Field::Month => {
                self.month = value;
                let len = days_in_month(value);
                if len > 0 && self.day >= len {
                    self.day = len - 1;
                }
            }
            Field::Day => self.day = value,
            Field::Hour => self.hour = value,
            Field::Minute => self.minute = value,
            Field::Second => self.second = value,
        }
        self
    }

    /// Exclusive upper bound of a field. The day bound follows the month.
    pub const fn bounds(&self, field: Field) -> u8 {
        match field {
            Field::Month => 12,
            Field::Day => days_in_month(self.month),
            Field::Hour => 24,
            Field::Minute | Field::Second => 60,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.month < 12
            && self.day < days_in_month(self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }
}

/// Split a seconds counter into calendar fields.
///
/// Values past the end of the year wrap around into the next cycle.
pub fn decompose(total_seconds: u64) -> CalendarFields {
    let total = normalize(total_seconds);

    let second = (total % SECONDS_PER_MINUTE) as u8;
    let minute = ((total / SECONDS_PER_MINUTE) % 60) as u8;
    let hour = ((total / SECONDS_PER_HOUR) % 24) as u8;

    // Walk the month table. A day exactly at a month length belongs to the
    // following month.
    let mut day = total / SECONDS_PER_DAY;
    let mut month = 0;
    for &len in MONTH_DAYS.iter() {
        if day < len as u64 {
            break;
        }
        day -= len as u64;
        month += 1;
    }

    CalendarFields {
        month,
        day: day as u8,
        hour,
        minute,
        second,
    }
}

/// Build the seconds counter from calendar fields.
///
/// This is the inverse of [`decompose`] for valid fields. Out of range input
/// is folded back: the month, hour, minute and second are reduced modulo
/// their bounds and the day is clamped to the month's last day.
pub const fn compose(fields: &CalendarFields) -> u64 {
    let month = fields.month % 12;
    let last_day = days_in_month(month) - 1;
    let day = if fields.day > last_day {
        last_day
    } else {
        fields.day
    };

    let mut days = day as u64;
    let mut i = 0;
    while i < month as usize {
        days += MONTH_DAYS[i] as u64;
        i += 1;
    }

    days * SECONDS_PER_DAY
        + (fields.hour % 24) as u64 * SECONDS_PER_HOUR
        + (fields.minute % 60) as u64 * SECONDS_PER_MINUTE
        + (fields.second % 60) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn month_table_covers_the_year() {
        let days: u64 = (0..12).map(|m| days_in_month(m) as u64).sum();
        assert_eq!(days, DAYS_PER_YEAR);
        assert_eq!(days_in_month(12), 0);
        assert_eq!(month_abbrev(0), "Jan");
        assert_eq!(month_abbrev(11), "Dec");
        assert_eq!(month_abbrev(12), "???");
    }

    #[test]
    fn first_of_february() {
        let fields = decompose(31 * SECONDS_PER_DAY);
        assert_eq!(fields, CalendarFields::new(1, 0, 0, 0, 0));
    }

    #[test]
    fn last_second_of_first_day() {
        assert_eq!(compose(&CalendarFields::new(0, 0, 23, 59, 59)), 86399);
    }

    #[test]
    fn month_boundaries_roll_over() {
        let mut start = 0;
        for month in 0..12u8 {
            let len = days_in_month(month) as u64;
            let last = decompose((start + len) * SECONDS_PER_DAY - 1);
            assert_eq!(last.month, month);
            assert_eq!(last.day as u64, len - 1);
            assert_eq!((last.hour, last.minute, last.second), (23, 59, 59));

            let first = decompose(start * SECONDS_PER_DAY);
            assert_eq!((first.month, first.day), (month, 0));
            start += len;
        }
    }

    #[test]
    fn round_trip_over_whole_year() {
        // Every day at a handful of times of day, plus a coarse walk over all
        // seconds.
        for day in 0..DAYS_PER_YEAR {
            for offset in [0, 1, 59, 60, 3599, 3600, 43_210, SECONDS_PER_DAY - 1] {
                let s = day * SECONDS_PER_DAY + offset;
                let fields = decompose(s);
                assert!(fields.is_valid(), "{fields:?}");
                assert_eq!(compose(&fields), s);
            }
        }
        for s in (0..SECONDS_PER_YEAR).step_by(997) {
            assert_eq!(compose(&decompose(s)), s);
        }
    }

    #[test]
    fn matches_chrono_for_non_leap_year() {
        for ordinal in 1..=365 {
            let date = NaiveDate::from_yo_opt(2023, ordinal).unwrap();
            let fields = decompose((ordinal as u64 - 1) * SECONDS_PER_DAY);
            assert_eq!(fields.month as u32, date.month0());
            assert_eq!(fields.day as u32, date.day0());
        }
    }

    #[test]
    fn corrupted_counter_wraps_instead_of_panicking() {
        assert_eq!(decompose(SECONDS_PER_YEAR), decompose(0));
        assert_eq!(decompose(SECONDS_PER_YEAR + 31 * SECONDS_PER_DAY).month, 1);
        assert!(decompose(u64::MAX).is_valid());
    }

    #[test]
    fn compose_folds_out_of_range_fields() {
        // February 30th clamps to the 28th.
        let s = compose(&CalendarFields::new(1, 29, 0, 0, 0));
        assert_eq!(decompose(s), CalendarFields::new(1, 27, 0, 0, 0));

        let s = compose(&CalendarFields::new(13, 0, 25, 61, 62));
        assert_eq!(decompose(s), CalendarFields::new(1, 0, 1, 1, 2));
    }

    #[test]
    fn changing_month_clamps_day() {
        let jan_31 = CalendarFields::new(0, 30, 12, 0, 0);
        let feb = jan_31.with(Field::Month, 1);
        assert_eq!(feb.day, 27);
        assert!(feb.is_valid());

        let apr = jan_31.with(Field::Month, 3);
        assert_eq!(apr.day, 29);
        assert_eq!(jan_31.with(Field::Month, 2).day, 30);
    }

    #[test]
    fn from_chrono_datetime() {
        let now = NaiveDate::from_ymd_opt(2025, 7, 20)
            .unwrap()
            .and_hms_opt(18, 0, 5)
            .unwrap();
        assert_eq!(
            CalendarFields::from_datetime(&now),
            CalendarFields::new(6, 19, 18, 0, 5)
        );

        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CalendarFields::from_datetime(&leap_day).day, 27);
    }

    #[test]
    fn field_bounds_follow_month() {
        let feb = CalendarFields::new(1, 0, 0, 0, 0);
        assert_eq!(feb.bounds(Field::Day), 28);
        assert_eq!(feb.bounds(Field::Month), 12);
        assert_eq!(feb.bounds(Field::Hour), 24);
        assert_eq!(feb.bounds(Field::Second), 60);
        assert_eq!(CalendarFields::new(6, 0, 0, 0, 0).bounds(Field::Day), 31);
    }
}
