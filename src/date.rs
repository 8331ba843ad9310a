// src/date.rs
use std::fmt;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A `YYYY-MM` or `YYYY-MM-DD` date as written in manifests and front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    pub year: i32,
    pub month: u32,
    pub day: Option<u32>,
}

impl PartialDate {
    /// Parse the leading date of `raw`; anything after the date (a time, a
    /// zone) is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let mut parts = raw.splitn(3, '-');
        let year = parts.next()?;
        if year.len() != 4 {
            return None;
        }
        let year = year.parse().ok()?;
        let month: u32 = parts.next()?.get(..2)?.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        let day = match parts.next() {
            Some(rest) => {
                let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                let day: u32 = digits.parse().ok()?;
                if !(1..=31).contains(&day) {
                    return None;
                }
                Some(day)
            }
            None => None,
        };
        Some(Self { year, month, day })
    }
}

/// `May 1, 2023`, or `May 2023` when there is no day.
impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = MONTHS[(self.month - 1) as usize];
        match self.day {
            Some(day) => write!(f, "{} {}, {}", month, day, self.year),
            None => write!(f, "{} {}", month, self.year),
        }
    }
}

/// Display form of a raw date string; unparseable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    PartialDate::parse(raw)
        .map(|d| d.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_and_partial() {
        assert_eq!(
            PartialDate::parse("2023-05-01"),
            Some(PartialDate { year: 2023, month: 5, day: Some(1) })
        );
        assert_eq!(
            PartialDate::parse(" 2024-11 "),
            Some(PartialDate { year: 2024, month: 11, day: None })
        );
        assert_eq!(
            PartialDate::parse("2024-02-09T10:00:00Z").and_then(|d| d.day),
            Some(9)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(PartialDate::parse("soon"), None);
        assert_eq!(PartialDate::parse("2024-13-01"), None);
        assert_eq!(PartialDate::parse("24-01-01"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_date("2023-05-01"), "May 1, 2023");
        assert_eq!(format_date("2023-12"), "Dec 2023");
        assert_eq!(format_date("someday"), "someday");
    }
}
