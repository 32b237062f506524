//! Millisecond timecode display for timeline positions.

use std::fmt;

use crate::Seconds;

/// Timecode representation (MM:SS.mmm, hours shown once non-zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
}

impl Timecode {
    /// Create timecode from a position in seconds. Negative and non-finite
    /// positions display as zero.
    pub fn from_seconds(position: Seconds) -> Self {
        let position = if position.is_finite() { position.max(0.0) } else { 0.0 };
        let total_millis = (position * 1000.0).round() as u64;
        let total_seconds = total_millis / 1000;

        Self {
            hours: (total_seconds / 3600) as u32,
            minutes: ((total_seconds % 3600) / 60) as u32,
            seconds: (total_seconds % 60) as u32,
            millis: (total_millis % 1000) as u32,
        }
    }

    /// Convert timecode back to seconds
    pub fn to_seconds(&self) -> Seconds {
        self.hours as f64 * 3600.0
            + self.minutes as f64 * 60.0
            + self.seconds as f64
            + self.millis as f64 / 1000.0
    }

    /// Parse `[HH:]MM:SS[.mmm]`
    pub fn parse(s: &str) -> Result<Self, String> {
        let (clock, millis) = match s.split_once('.') {
            Some((clock, frac)) => {
                if frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err("Invalid milliseconds".to_string());
                }
                let padded = format!("{frac:0<3}");
                let millis = padded
                    .parse::<u32>()
                    .map_err(|_| "Invalid milliseconds".to_string())?;
                (clock, millis)
            }
            None => (s, 0),
        };

        let parts: Vec<&str> = clock.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [m, s] => ("0", *m, *s),
            [h, m, s] => (*h, *m, *s),
            _ => return Err("Invalid timecode format. Expected [HH:]MM:SS[.mmm]".to_string()),
        };

        let hours = hours
            .parse::<u32>()
            .map_err(|_| "Invalid hours".to_string())?;
        let minutes = minutes
            .parse::<u32>()
            .map_err(|_| "Invalid minutes".to_string())?;
        let seconds = seconds
            .parse::<u32>()
            .map_err(|_| "Invalid seconds".to_string())?;

        if minutes >= 60 || seconds >= 60 {
            return Err("Minutes and seconds must be < 60".to_string());
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
            millis,
        })
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(
                f,
                "{:02}:{:02}:{:02}.{:03}",
                self.hours, self.minutes, self.seconds, self.millis
            )
        } else {
            write!(f, "{:02}:{:02}.{:03}", self.minutes, self.seconds, self.millis)
        }
    }
}

/// Shorthand for display in logs and listings.
pub fn format_timecode(position: Seconds) -> String {
    Timecode::from_seconds(position).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(format_timecode(0.0), "00:00.000");
        assert_eq!(format_timecode(5.25), "00:05.250");
        assert_eq!(format_timecode(61.0), "01:01.000");
        assert_eq!(format_timecode(3723.5), "01:02:03.500");
        assert_eq!(format_timecode(-4.0), "00:00.000");
        assert_eq!(format_timecode(f64::NAN), "00:00.000");
    }

    #[test]
    fn test_parse() {
        let tc = Timecode::parse("01:30.5").unwrap();
        assert_eq!(tc.minutes, 1);
        assert_eq!(tc.seconds, 30);
        assert_eq!(tc.millis, 500);
        assert_eq!(tc.to_seconds(), 90.5);

        let tc = Timecode::parse("02:00:00").unwrap();
        assert_eq!(tc.to_seconds(), 7200.0);

        assert!(Timecode::parse("00:75").is_err());
        assert!(Timecode::parse("12").is_err());
        assert!(Timecode::parse("00:01.").is_err());
    }
}
