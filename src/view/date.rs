use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Result, ViewerError};
use crate::view::state::Event;

/// Format the invoice API expects, whatever the display format is
pub const REQUEST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest year the range picker offers
pub const PICKER_MIN_YEAR: i32 = 1901;

/// A date control: holds the chosen day and turns user input into
/// `DateChanged` notifications.
pub trait DateSelector {
    fn value(&self) -> NaiveDate;

    /// Replace the current date, enforcing the control's bounds
    fn set_value(&mut self, date: NaiveDate) -> Result<()>;

    /// Read a date typed in the control's own input format
    fn parse(&self, input: &str) -> Result<NaiveDate>;

    fn display(&self, date: NaiveDate) -> String;

    fn shift_by(&mut self, days: i64) -> Result<Event> {
        let current = self.value();
        let shifted = if days >= 0 {
            current.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            current.checked_sub_days(Days::new(days.unsigned_abs()))
        }
        .ok_or_else(|| ViewerError::DateOutOfRange {
            date: format!("{current} {days:+} days"),
            min: NaiveDate::MIN,
            max: NaiveDate::MAX,
        })?;

        self.set_value(shifted)?;
        Ok(Event::DateChanged(shifted))
    }

    fn set_explicit(&mut self, input: &str) -> Result<Event> {
        let date = self.parse(input)?;
        self.set_value(date)?;
        Ok(Event::DateChanged(date))
    }

    fn request_date(&self) -> String {
        self.value().format(REQUEST_DATE_FORMAT).to_string()
    }
}

fn check_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ViewerError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

/// Plain ISO date entry (`2024-03-05`), no bounds of its own.
#[derive(Debug, Clone)]
pub struct NativeDateInput {
    date: NaiveDate,
    display_format: String,
}

impl NativeDateInput {
    pub fn new(today: NaiveDate, display_format: &str) -> Result<Self> {
        check_format(display_format)?;
        Ok(Self {
            date: today,
            display_format: display_format.to_string(),
        })
    }
}

impl DateSelector for NativeDateInput {
    fn value(&self) -> NaiveDate {
        self.date
    }

    fn set_value(&mut self, date: NaiveDate) -> Result<()> {
        self.date = date;
        Ok(())
    }

    fn parse(&self, input: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(input.trim(), REQUEST_DATE_FORMAT).map_err(|_| {
            ViewerError::InvalidDate {
                input: input.to_string(),
                expected: "YYYY-MM-DD".to_string(),
            }
        })
    }

    fn display(&self, date: NaiveDate) -> String {
        date.format(&self.display_format).to_string()
    }
}

/// Calendar picker that reads and shows dates in the display format
/// (`5 Mar 2024`) and only offers years from 1901 to the current year.
#[derive(Debug, Clone)]
pub struct RangePicker {
    date: NaiveDate,
    display_format: String,
    min: NaiveDate,
    max: NaiveDate,
}

impl RangePicker {
    const ALT_FORMAT: &'static str = "%m/%d/%Y";

    pub fn new(today: NaiveDate, display_format: &str) -> Result<Self> {
        check_format(display_format)?;
        let min = NaiveDate::from_ymd_opt(PICKER_MIN_YEAR, 1, 1).unwrap_or(NaiveDate::MIN);
        let max = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(NaiveDate::MAX);
        Ok(Self {
            date: today,
            display_format: display_format.to_string(),
            min,
            max,
        })
    }

    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.min, self.max)
    }
}

impl DateSelector for RangePicker {
    fn value(&self) -> NaiveDate {
        self.date
    }

    fn set_value(&mut self, date: NaiveDate) -> Result<()> {
        if date < self.min || date > self.max {
            return Err(ViewerError::DateOutOfRange {
                date: self.display(date),
                min: self.min,
                max: self.max,
            });
        }
        self.date = date;
        Ok(())
    }

    fn parse(&self, input: &str) -> Result<NaiveDate> {
        let input = input.trim();
        NaiveDate::parse_from_str(input, &self.display_format)
            .or_else(|_| NaiveDate::parse_from_str(input, Self::ALT_FORMAT))
            .map_err(|_| ViewerError::InvalidDate {
                input: input.to_string(),
                expected: format!("{} or MM/DD/YYYY", self.display(self.date)),
            })
    }

    fn display(&self, date: NaiveDate) -> String {
        date.format(&self.display_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMAT;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn native(on: NaiveDate) -> NativeDateInput {
        NativeDateInput::new(on, DEFAULT_DATE_FORMAT).unwrap()
    }

    fn picker(today: NaiveDate) -> RangePicker {
        RangePicker::new(today, DEFAULT_DATE_FORMAT).unwrap()
    }

    #[test]
    fn shift_round_trips_across_boundaries() {
        let edges = [
            date(2024, 2, 28),
            date(2024, 2, 29),
            date(2023, 2, 28),
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 4, 30),
            date(2000, 2, 29),
            date(1900, 2, 28),
        ];
        for start in edges {
            let mut selector = native(start);
            selector.shift_by(1).unwrap();
            selector.shift_by(-1).unwrap();
            assert_eq!(selector.value(), start, "round trip from {start}");
        }
    }

    #[test]
    fn shift_rolls_over_month_and_year() {
        let mut selector = native(date(2024, 2, 28));
        assert!(matches!(
            selector.shift_by(1).unwrap(),
            Event::DateChanged(d) if d == date(2024, 2, 29)
        ));
        selector.shift_by(1).unwrap();
        assert_eq!(selector.value(), date(2024, 3, 1));

        let mut selector = native(date(2023, 12, 31));
        selector.shift_by(1).unwrap();
        assert_eq!(selector.value(), date(2024, 1, 1));
        selector.shift_by(-366).unwrap();
        assert_eq!(selector.value(), date(2022, 12, 31));
    }

    #[test]
    fn shift_past_calendar_end_fails_without_moving() {
        let mut selector = native(NaiveDate::MAX);
        assert!(matches!(
            selector.shift_by(1),
            Err(ViewerError::DateOutOfRange { .. })
        ));
        assert_eq!(selector.value(), NaiveDate::MAX);
    }

    #[test]
    fn native_accepts_iso_only() {
        let mut selector = native(date(2024, 1, 1));
        let event = selector.set_explicit("2024-03-05").unwrap();
        assert!(matches!(event, Event::DateChanged(d) if d == date(2024, 3, 5)));
        assert!(matches!(
            selector.set_explicit("5 Mar 2024"),
            Err(ViewerError::InvalidDate { .. })
        ));
        assert_eq!(selector.value(), date(2024, 3, 5));
    }

    #[test]
    fn picker_display_input_maps_to_iso_request() {
        let mut selector = picker(date(2024, 6, 1));
        selector.set_explicit("5 Mar 2024").unwrap();
        assert_eq!(selector.request_date(), "2024-03-05");
        assert_eq!(selector.display(selector.value()), "5 Mar 2024");

        selector.set_explicit("12/25/2023").unwrap();
        assert_eq!(selector.request_date(), "2023-12-25");
    }

    #[test]
    fn picker_enforces_year_range() {
        let mut selector = picker(date(2024, 6, 1));
        assert_eq!(selector.bounds(), (date(1901, 1, 1), date(2024, 12, 31)));

        assert!(matches!(
            selector.set_explicit("31 Dec 1900"),
            Err(ViewerError::DateOutOfRange { .. })
        ));
        assert!(selector.set_explicit("1 Jan 2025").is_err());

        selector.set_value(date(2024, 12, 31)).unwrap();
        assert!(selector.shift_by(1).is_err());
        assert_eq!(selector.value(), date(2024, 12, 31));
    }

    #[test]
    fn request_date_ignores_display_format() {
        let selector = NativeDateInput::new(date(2024, 3, 5), "%A, %d %B %Y").unwrap();
        assert_eq!(selector.display(selector.value()), "Tuesday, 05 March 2024");
        assert_eq!(selector.request_date(), "2024-03-05");
    }

    #[test]
    fn rejects_broken_display_format() {
        assert!(matches!(
            RangePicker::new(date(2024, 1, 1), "%Q"),
            Err(ViewerError::InvalidDateFormat(_))
        ));
    }
}
