use chrono::{Days, Local, NaiveDate};

/// Calendar date format used for daily keys and CLI input.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A simple clock abstraction for deterministic dates in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDate),
}

impl Clock {
    /// Returns a clock that follows the local calendar date.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given date.
    #[must_use]
    pub fn fixed(at: NaiveDate) -> Self {
        Self::Fixed(at)
    }

    /// Returns today's date according to the clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Default => Local::now().date_naive(),
            Clock::Fixed(d) => *d,
        }
    }

    /// Today's date as a daily key (`YYYY-MM-DD`).
    #[must_use]
    pub fn today_key(&self) -> String {
        date_key(self.today())
    }

    /// If this is a fixed clock, advance it by the given number of days.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance_days(&mut self, days: u64) {
        if let Clock::Fixed(d) = self {
            if let Some(next) = d.checked_add_days(Days::new(days)) {
                *d = next;
            }
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Format a date as a daily key.
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `chrono::ParseError` if the input is not a valid calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_KEY_FORMAT)
}

/// Deterministic date for tests and examples (2024-01-01).
///
/// # Panics
///
/// Panics if the fixed date cannot be represented.
#[must_use]
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("fixed date should be valid")
}

/// Returns a `Clock` fixed at the deterministic test date.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_today())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        assert_eq!(clock.today_key(), "2024-01-01");
        clock.advance_days(31);
        assert_eq!(clock.today_key(), "2024-02-01");
    }

    #[test]
    fn default_clock_does_not_advance() {
        let mut clock = Clock::default_clock();
        clock.advance_days(3);
        assert!(!clock.is_fixed());
    }

    #[test]
    fn parses_date_keys() {
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
