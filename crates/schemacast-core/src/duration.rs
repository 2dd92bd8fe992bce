//! # ISO-8601 Durations
//!
//! Defines [`IsoDuration`], the decoded form of the `duration` format:
//! `P[nY][nM][nW][nD][T[nH][nM][nS]]`.
//!
//! Calendar units (years, months) have no fixed length, so each designator
//! is kept as its own component rather than collapsed into a second count.
//! [`IsoDuration::to_std`] converts to a fixed-length duration only when no
//! calendar units are present.
//!
//! ## Parsing
//!
//! The text after `P` is split on `T` into a date part and an optional
//! time part; each part is scanned with a designator regex that must
//! consume the whole part, in canonical designator order. `P` and `PT` with
//! no components are rejected.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DurationError;

/// A parsed ISO-8601 duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IsoDuration {
    /// `nY`
    pub years: f64,
    /// `nM` before `T`
    pub months: f64,
    /// `nW`
    pub weeks: f64,
    /// `nD`
    pub days: f64,
    /// `nH`
    pub hours: f64,
    /// `nM` after `T`
    pub minutes: f64,
    /// `nS`
    pub seconds: f64,
}

fn date_part_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(\d+(?:[.,]\d+)?)Y)?(?:(\d+(?:[.,]\d+)?)M)?(?:(\d+(?:[.,]\d+)?)W)?(?:(\d+(?:[.,]\d+)?)D)?$",
        )
        .expect("date designator regex is valid")
    })
}

fn time_part_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+(?:[.,]\d+)?)H)?(?:(\d+(?:[.,]\d+)?)M)?(?:(\d+(?:[.,]\d+)?)S)?$")
            .expect("time designator regex is valid")
    })
}

/// Scan one part against its designator regex, returning the captured
/// component values (0.0 where a designator is absent) and whether any
/// designator was present.
fn scan_part<const N: usize>(part: &str, re: &Regex) -> Result<([f64; N], bool), DurationError> {
    let caps = re
        .captures(part)
        .ok_or_else(|| DurationError::UnrecognizedComponent(part.to_string()))?;
    let mut values = [0.0; N];
    let mut any = false;
    for (i, slot) in values.iter_mut().enumerate() {
        if let Some(m) = caps.get(i + 1) {
            *slot = m
                .as_str()
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|e| DurationError::InvalidNumber {
                    number: m.as_str().to_string(),
                    reason: e.to_string(),
                })?;
            any = true;
        }
    }
    Ok((values, any))
}

impl IsoDuration {
    /// Parse an ISO-8601 duration string.
    ///
    /// # Errors
    ///
    /// Returns a [`DurationError`] naming the first problem found.
    pub fn parse(s: &str) -> Result<Self, DurationError> {
        let body = s
            .strip_prefix('P')
            .ok_or_else(|| DurationError::MissingPrefix(s.to_string()))?;

        let mut parts = body.split('T');
        let date_part = parts.next().unwrap_or("");
        let time_part = parts.next();
        if parts.next().is_some() {
            return Err(DurationError::RepeatedSeparator(s.to_string()));
        }

        let ([years, months, weeks, days], has_date) = scan_part::<4>(date_part, date_part_regex())?;
        let mut has_time = false;
        let mut time = [0.0; 3];
        if let Some(tp) = time_part {
            let (values, any) = scan_part::<3>(tp, time_part_regex())?;
            if !any {
                return Err(DurationError::EmptyTimePart(s.to_string()));
            }
            time = values;
            has_time = true;
        }
        if !has_date && !has_time {
            return Err(DurationError::NoComponents(s.to_string()));
        }

        let [hours, minutes, seconds] = time;
        Ok(Self {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        })
    }

    /// True when the duration uses years or months, whose length depends
    /// on the calendar.
    pub fn has_calendar_units(&self) -> bool {
        self.years != 0.0 || self.months != 0.0
    }

    /// Total length in seconds, counting weeks as 7 days and days as
    /// 86 400 seconds. `None` if calendar units are present.
    pub fn total_seconds(&self) -> Option<f64> {
        if self.has_calendar_units() {
            return None;
        }
        Some(
            self.weeks * 7.0 * 86_400.0
                + self.days * 86_400.0
                + self.hours * 3_600.0
                + self.minutes * 60.0
                + self.seconds,
        )
    }

    /// Convert to a fixed-length `std::time::Duration`.
    /// `None` if calendar units are present.
    pub fn to_std(&self) -> Option<std::time::Duration> {
        self.total_seconds()
            .and_then(|secs| std::time::Duration::try_from_secs_f64(secs).ok())
    }

    /// Render in ISO-8601 form, omitting zero components.
    pub fn to_iso8601(&self) -> String {
        let mut out = String::from("P");
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value != 0.0 {
                out.push_str(&format!("{value}{designator}"));
            }
        }
        let time: Vec<(f64, char)> = [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')]
            .into_iter()
            .filter(|(v, _)| *v != 0.0)
            .collect();
        if !time.is_empty() {
            out.push('T');
            for (value, designator) in time {
                out.push_str(&format!("{value}{designator}"));
            }
        }
        if out.len() == 1 {
            out.push_str("T0S");
        }
        out
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl std::str::FromStr for IsoDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_and_time_parts() {
        let d = IsoDuration::parse("P1Y2M3W4DT5H6M7.5S").unwrap();
        assert_eq!(d.years, 1.0);
        assert_eq!(d.months, 2.0);
        assert_eq!(d.weeks, 3.0);
        assert_eq!(d.days, 4.0);
        assert_eq!(d.hours, 5.0);
        assert_eq!(d.minutes, 6.0);
        assert_eq!(d.seconds, 7.5);
    }

    #[test]
    fn test_month_vs_minute_disambiguated_by_t() {
        let months = IsoDuration::parse("P3M").unwrap();
        let minutes = IsoDuration::parse("PT3M").unwrap();
        assert_eq!(months.months, 3.0);
        assert_eq!(months.minutes, 0.0);
        assert_eq!(minutes.minutes, 3.0);
        assert_eq!(minutes.months, 0.0);
    }

    #[test]
    fn test_comma_decimal_separator() {
        let d = IsoDuration::parse("PT0,5S").unwrap();
        assert_eq!(d.seconds, 0.5);
    }

    #[test]
    fn test_error_names_the_problem() {
        assert_eq!(
            IsoDuration::parse("1D"),
            Err(DurationError::MissingPrefix("1D".into()))
        );
        assert_eq!(IsoDuration::parse("P"), Err(DurationError::NoComponents("P".into())));
        assert_eq!(
            IsoDuration::parse("P1DT"),
            Err(DurationError::EmptyTimePart("P1DT".into()))
        );
        assert_eq!(
            IsoDuration::parse("P1DT1HT2M"),
            Err(DurationError::RepeatedSeparator("P1DT1HT2M".into()))
        );
        assert_eq!(
            IsoDuration::parse("P1D2Y"),
            Err(DurationError::UnrecognizedComponent("1D2Y".into()))
        );
        assert!("P2W".parse::<IsoDuration>().is_ok());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(IsoDuration::parse("").is_err());
        assert!(IsoDuration::parse("1D").is_err());
        assert!(IsoDuration::parse("P").is_err());
        assert!(IsoDuration::parse("PT").is_err());
        assert!(IsoDuration::parse("P1DT").is_err());
        assert!(IsoDuration::parse("P1D2Y").is_err());
        assert!(IsoDuration::parse("P1DT1HT2M").is_err());
        assert!(IsoDuration::parse("PXD").is_err());
    }

    #[test]
    fn test_total_seconds_without_calendar_units() {
        let d = IsoDuration::parse("P1DT1H30S").unwrap();
        assert_eq!(d.total_seconds(), Some(86_400.0 + 3_600.0 + 30.0));
        assert_eq!(d.to_std(), Some(std::time::Duration::from_secs(90_030)));
    }

    #[test]
    fn test_calendar_units_have_no_fixed_length() {
        let d = IsoDuration::parse("P1Y").unwrap();
        assert!(d.has_calendar_units());
        assert_eq!(d.total_seconds(), None);
    }

    #[test]
    fn test_iso8601_rendering() {
        assert_eq!(IsoDuration::parse("P1Y2DT3H").unwrap().to_iso8601(), "P1Y2DT3H");
        assert_eq!(IsoDuration::parse("PT1.5S").unwrap().to_string(), "PT1.5S");
        assert_eq!(IsoDuration::default().to_iso8601(), "PT0S");
    }

    #[test]
    fn test_rendering_reparses_to_same_value() {
        for s in ["P4W", "P1Y6M", "PT36H", "P2DT0.25S"] {
            let d = IsoDuration::parse(s).unwrap();
            assert_eq!(IsoDuration::parse(&d.to_iso8601()).unwrap(), d, "{s}");
        }
    }
}
