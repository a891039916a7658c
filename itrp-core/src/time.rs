//! Calendar dates to the climatology's fractional-year time coordinate
//!
//! The model time coordinate `t` counts years since 2000:
//!
//! $$ t = (Y - 2000) + \frac{d}{N_Y} $$
//!
//! where $d$ is the zero-based day of year and $N_Y$ the number of days in
//! year $Y$ (the distance between 1 January of $Y$ and of $Y + 1$). The time
//! of day does not contribute to $t$.
//!
//! # Examples
//!
//! ```rust
//! use itrp_core::time::TimeCoordinate;
//!
//! let t = TimeCoordinate::from_ymd(2015, 10, 1).unwrap();
//! assert!((t.coordinate() - (15.0 + 273.0 / 365.0)).abs() < 1e-12);
//! ```

use crate::errors::{ItrpError, ItrpResult};
use crate::FloatValue;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Year at which the time coordinate is zero
pub const EPOCH_YEAR: i32 = 2000;

/// Hour used when a calendar date is given without one (midday)
pub const DEFAULT_HOUR: u32 = 12;

/// A date argument for the time coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpec {
    /// A complete date and time
    DateTime(NaiveDateTime),
    /// A calendar date with an optional hour, defaulting to [`DEFAULT_HOUR`]
    Calendar {
        year: i32,
        month: u32,
        day: u32,
        hour: Option<u32>,
    },
}

impl DateSpec {
    /// Resolve to a concrete datetime, validating calendar fields
    pub fn to_datetime(&self) -> ItrpResult<NaiveDateTime> {
        match *self {
            DateSpec::DateTime(datetime) => Ok(datetime),
            DateSpec::Calendar {
                year,
                month,
                day,
                hour,
            } => {
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    ItrpError::InvalidInput(format!(
                        "{:04}-{:02}-{:02} is not a valid calendar date",
                        year, month, day
                    ))
                })?;
                let hour = hour.unwrap_or(DEFAULT_HOUR);
                let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(|| {
                    ItrpError::InvalidInput(format!("hour must be within 0-23, got {}", hour))
                })?;
                Ok(date.and_time(time))
            }
        }
    }
}

impl From<NaiveDateTime> for DateSpec {
    fn from(value: NaiveDateTime) -> Self {
        DateSpec::DateTime(value)
    }
}

impl From<NaiveDate> for DateSpec {
    fn from(value: NaiveDate) -> Self {
        DateSpec::Calendar {
            year: value.year(),
            month: value.month(),
            day: value.day(),
            hour: None,
        }
    }
}

impl From<(i32, u32, u32)> for DateSpec {
    fn from((year, month, day): (i32, u32, u32)) -> Self {
        DateSpec::Calendar {
            year,
            month,
            day,
            hour: None,
        }
    }
}

impl From<(i32, u32, u32, u32)> for DateSpec {
    fn from((year, month, day, hour): (i32, u32, u32, u32)) -> Self {
        DateSpec::Calendar {
            year,
            month,
            day,
            hour: Some(hour),
        }
    }
}

/// Build a date from an ordered `(year, month, day[, hour])` sequence
impl TryFrom<&[i64]> for DateSpec {
    type Error = ItrpError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        let (year, month, day, hour) = match *values {
            [year, month, day] => (year, month, day, None),
            [year, month, day, hour] => (year, month, day, Some(hour)),
            _ => {
                return Err(ItrpError::InvalidInput(format!(
                    "expected (year, month, day[, hour]), got {} elements",
                    values.len()
                )))
            }
        };

        let field = |name: &str, value: i64| {
            u32::try_from(value).map_err(|_| {
                ItrpError::InvalidInput(format!("{} out of range: {}", name, value))
            })
        };

        Ok(DateSpec::Calendar {
            year: i32::try_from(year)
                .map_err(|_| ItrpError::InvalidInput(format!("year out of range: {}", year)))?,
            month: field("month", month)?,
            day: field("day", day)?,
            hour: hour.map(|h| field("hour", h)).transpose()?,
        })
    }
}

/// Fractional-year time coordinate of a date
///
/// The coordinate is computed once at construction from the normalised
/// datetime, which remains available through [`TimeCoordinate::as_datetime`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeCoordinate {
    datetime: NaiveDateTime,
    coordinate: FloatValue,
}

impl TimeCoordinate {
    pub fn new(date: impl Into<DateSpec>) -> ItrpResult<Self> {
        let datetime = date.into().to_datetime()?;
        let coordinate = fractional_year(datetime.date())?;
        Ok(Self {
            datetime,
            coordinate,
        })
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> ItrpResult<Self> {
        Self::new(datetime)
    }

    /// Midday on the given date
    pub fn from_date(date: NaiveDate) -> ItrpResult<Self> {
        Self::new(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> ItrpResult<Self> {
        Self::new((year, month, day))
    }

    pub fn from_ymdh(year: i32, month: u32, day: u32, hour: u32) -> ItrpResult<Self> {
        Self::new((year, month, day, hour))
    }

    /// Years since 2000 as used by the climatology model
    pub fn coordinate(&self) -> FloatValue {
        self.coordinate
    }

    /// The normalised datetime the coordinate was computed from
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.datetime
    }
}

impl TryFrom<&[i64]> for TimeCoordinate {
    type Error = ItrpError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        Self::new(DateSpec::try_from(values)?)
    }
}

/// Parse `YYYY-MM-DD` (midday) or `YYYY-MM-DDTHH:MM:SS`
impl FromStr for TimeCoordinate {
    type Err = ItrpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Self::new(datetime);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Self::new(date);
        }
        Err(ItrpError::InvalidInput(format!(
            "could not parse '{}' as a date (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)",
            s
        )))
    }
}

impl fmt::Display for TimeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={:.4})", self.datetime, self.coordinate)
    }
}

fn fractional_year(date: NaiveDate) -> ItrpResult<FloatValue> {
    let year = date.year();
    let out_of_range =
        || ItrpError::InvalidInput(format!("year {} is outside the supported range", year));

    let start = NaiveDate::from_yo_opt(year, 1).ok_or_else(out_of_range)?;
    let next = NaiveDate::from_yo_opt(year + 1, 1).ok_or_else(out_of_range)?;

    let days_in_year = next.signed_duration_since(start).num_days();
    let offset = date.signed_duration_since(start).num_days();

    Ok(FloatValue::from(year - EPOCH_YEAR) + offset as FloatValue / days_in_year as FloatValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_epoch_is_zero() {
        let t = TimeCoordinate::from_ymd(2000, 1, 1).unwrap();
        assert_eq!(t.coordinate(), 0.0);
    }

    #[test]
    fn test_default_hour_is_midday() {
        let t = TimeCoordinate::from_ymd(2015, 10, 1).unwrap();
        let expected = NaiveDate::from_ymd_opt(2015, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(t.as_datetime(), expected);
    }

    #[test]
    fn test_hour_does_not_change_coordinate() {
        let morning = TimeCoordinate::from_ymdh(2015, 10, 1, 0).unwrap();
        let evening = TimeCoordinate::from_ymdh(2015, 10, 1, 23).unwrap();
        assert_eq!(morning.coordinate(), evening.coordinate());
        assert_ne!(morning.as_datetime(), evening.as_datetime());
    }

    #[test]
    fn test_datetime_and_tuple_agree() {
        let datetime = NaiveDate::from_ymd_opt(2012, 3, 15)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        let from_datetime = TimeCoordinate::from_datetime(datetime).unwrap();
        let from_tuple = TimeCoordinate::from_ymd(2012, 3, 15).unwrap();
        assert_eq!(from_datetime.coordinate(), from_tuple.coordinate());
        assert_eq!(from_datetime.as_datetime(), datetime);
    }

    #[test]
    fn test_before_epoch_is_negative() {
        let t = TimeCoordinate::from_ymd(1999, 7, 2).unwrap();
        assert!(t.coordinate() < 0.0 && t.coordinate() > -1.0);
    }

    #[test]
    fn test_invalid_calendar_date() {
        let result = TimeCoordinate::from_ymd(2015, 2, 30);
        assert!(matches!(result, Err(ItrpError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_hour() {
        let result = TimeCoordinate::from_ymdh(2015, 2, 3, 24);
        assert!(matches!(result, Err(ItrpError::InvalidInput(_))));
    }

    #[test]
    fn test_sequence_lengths() {
        assert!(TimeCoordinate::try_from(&[2015_i64, 10, 1][..]).is_ok());
        assert!(TimeCoordinate::try_from(&[2015_i64, 10, 1, 6][..]).is_ok());

        let rejected: [&[i64]; 4] = [&[], &[2015], &[2015, 10], &[2015, 10, 1, 6, 0]];
        for values in rejected {
            assert!(
                matches!(
                    TimeCoordinate::try_from(values),
                    Err(ItrpError::InvalidInput(_))
                ),
                "Expected {:?} to be rejected",
                values
            );
        }
    }

    #[test]
    fn test_sequence_negative_fields() {
        let result = DateSpec::try_from(&[2015_i64, -1, 1][..]);
        assert!(matches!(result, Err(ItrpError::InvalidInput(_))));
    }

    #[test]
    fn test_parse() {
        let date: TimeCoordinate = "2015-10-01".parse().unwrap();
        let datetime: TimeCoordinate = "2015-10-01T03:00:00".parse().unwrap();
        assert_eq!(date.coordinate(), datetime.coordinate());
        assert_eq!(date.as_datetime().format("%H").to_string(), "12");
        assert_eq!(datetime.as_datetime().format("%H").to_string(), "03");

        assert!(matches!(
            "October 2015".parse::<TimeCoordinate>(),
            Err(ItrpError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let t = TimeCoordinate::from_ymd(2016, 2, 29).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let restored: TimeCoordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(t, restored);
    }
}
