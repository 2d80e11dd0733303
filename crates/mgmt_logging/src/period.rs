//! Rotation periods derived from file name suffixes.
//!
//! A suffix is a date pattern appended to the file name on rotation, such as
//! `.yyyy-MM-dd`. The handler rotates as often as the smallest unit in the
//! pattern changes. Text between single quotes is literal, and `''` is a
//! literal quote.

use serde::Serialize;

use crate::error::LoggingError;

/// How often a periodic handler rotates its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationPeriod {
    /// Every minute.
    Minute,
    /// Every hour.
    Hour,
    /// At noon and midnight.
    HalfDay,
    /// Every day.
    Day,
    /// Every week.
    Week,
    /// Every month.
    Month,
    /// Every year.
    Year,
}

impl RotationPeriod {
    /// The period a pattern letter changes with, if any.
    #[must_use]
    pub fn for_letter(letter: char) -> Option<Self> {
        match letter {
            'y' => Some(Self::Year),
            'M' => Some(Self::Month),
            'w' | 'W' => Some(Self::Week),
            'D' | 'd' | 'F' | 'E' => Some(Self::Day),
            'a' => Some(Self::HalfDay),
            'H' | 'K' | 'k' | 'h' => Some(Self::Hour),
            'm' => Some(Self::Minute),
            _ => None,
        }
    }

    /// The smallest period of the units in `suffix`.
    ///
    /// # Errors
    ///
    /// - [`LoggingError::NoDatePattern`] if no unit appears outside quotes
    /// - [`LoggingError::UnterminatedQuote`] if a quote is left open
    ///
    /// ```
    /// use mgmt_logging::period::RotationPeriod;
    ///
    /// assert_eq!(RotationPeriod::from_suffix(".yyyy-MM-dd")?, RotationPeriod::Day);
    /// assert_eq!(RotationPeriod::from_suffix(".yyyy-MM-dd'h'HH")?, RotationPeriod::Hour);
    /// # Ok::<(), mgmt_logging::error::LoggingError>(())
    /// ```
    pub fn from_suffix(suffix: &str) -> Result<Self, LoggingError> {
        let mut quoted = false;
        let mut period: Option<Self> = None;
        for c in suffix.chars() {
            if c == '\'' {
                quoted = !quoted;
                continue;
            }
            if quoted {
                continue;
            }
            if let Some(unit) = Self::for_letter(c) {
                period = Some(period.map_or(unit, |current| current.min(unit)));
            }
        }

        if quoted {
            return Err(LoggingError::UnterminatedQuote(suffix.to_string()));
        }
        period.ok_or_else(|| LoggingError::NoDatePattern(suffix.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_unit_wins() {
        let cases = [
            (".yyyy", RotationPeriod::Year),
            (".yyyy-MM", RotationPeriod::Month),
            (".yyyy-ww", RotationPeriod::Week),
            (".yyyy-MM-dd", RotationPeriod::Day),
            (".yyyy-MM-dd-a", RotationPeriod::HalfDay),
            (".yyyy-MM-dd-HH", RotationPeriod::Hour),
            (".yyyy-MM-dd-HH-mm", RotationPeriod::Minute),
        ];
        for (suffix, expected) in cases {
            assert_eq!(RotationPeriod::from_suffix(suffix).unwrap(), expected, "{suffix}");
        }
    }

    #[test]
    fn quoted_text_is_ignored() {
        assert_eq!(
            RotationPeriod::from_suffix(".yyyy-MM-dd'T'").unwrap(),
            RotationPeriod::Day
        );
        assert_eq!(
            RotationPeriod::from_suffix("'month'.yyyy").unwrap(),
            RotationPeriod::Year
        );
        assert_eq!(
            RotationPeriod::from_suffix(".yyyy''MM").unwrap(),
            RotationPeriod::Month
        );
    }

    #[test]
    fn rejects_suffixes_without_units() {
        assert_eq!(
            RotationPeriod::from_suffix(".log").unwrap_err(),
            LoggingError::NoDatePattern(".log".to_string())
        );
        assert_eq!(
            RotationPeriod::from_suffix("'yyyy'").unwrap_err(),
            LoggingError::NoDatePattern("'yyyy'".to_string())
        );
        assert_eq!(
            RotationPeriod::from_suffix(".yyyy'MM").unwrap_err(),
            LoggingError::UnterminatedQuote(".yyyy'MM".to_string())
        );
    }
}
