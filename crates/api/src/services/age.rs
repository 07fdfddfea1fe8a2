// Age calculation for the webhook endpoint. Never touches storage.

use chrono::{Local, NaiveDate};
use roster_core::{age_on, parse_date, DateParseError};

#[derive(Debug, thiserror::Error)]
pub enum AgeError {
    #[error("birth_date is required")]
    MissingBirthDate,

    #[error("invalid birth date")]
    InvalidBirthDate(#[source] DateParseError),
}

/// Computes ages against a clock that tests can pin.
#[derive(Clone, Copy)]
pub struct AgeService {
    clock: fn() -> NaiveDate,
}

impl AgeService {
    pub fn new() -> Self {
        Self::with_clock(|| Local::now().date_naive())
    }

    pub fn with_clock(clock: fn() -> NaiveDate) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn calculate(&self, birth_date: Option<&str>) -> Result<i32, AgeError> {
        let raw = birth_date
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AgeError::MissingBirthDate)?;
        let birth = parse_date(raw).map_err(AgeError::InvalidBirthDate)?;
        Ok(age_on(birth, self.today()))
    }
}

impl Default for AgeService {
    fn default() -> Self {
        Self::new()
    }
}
