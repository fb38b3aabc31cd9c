// svckit/src/display.rs
//
// French display formatting for dates, capacities and media URLs

use chrono::{DateTime, Datelike, NaiveDate, Utc};

const MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.", "déc.",
];

pub fn month_abbrev(month: u32) -> &'static str {
    MONTHS_SHORT[((month.clamp(1, 12)) - 1) as usize]
}

/// "MMM yyyy", e.g. "mars 2025".
pub fn format_month(year: i32, month: u32) -> String {
    format!("{} {}", month_abbrev(month), year)
}

/// "dd MMM yyyy", e.g. "05 mars 2025".
pub fn format_day(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_abbrev(date.month()), date.year())
}

/// "dd MMM yyyy à HH:mm".
pub fn format_day_time(ts: DateTime<Utc>) -> String {
    format!("{} à {}", format_day(ts.date_naive()), ts.format("%H:%M"))
}

pub fn format_optional_day(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| format_day(ts.date_naive())).unwrap_or_else(|| "-".to_string())
}

/// Parses a backend date (`YYYY-MM-DD` or a full timestamp) and formats it;
/// anything unparseable is returned verbatim.
pub fn format_date_text(raw: &str) -> String {
    parse_date(raw).map(format_day).unwrap_or_else(|| raw.to_string())
}

pub fn format_date_range(start: &str, end: &str) -> String {
    format!("{} - {}", format_date_text(start), format_date_text(end))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| crate::types::parse_timestamp(raw).map(|ts| ts.date_naive()))
}

/// Thousands separated by a space, e.g. `45 000`.
pub fn format_capacity(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// First two characters, upper-cased. Stand-in for a missing logo.
pub fn initials(name: &str) -> String {
    name.chars().take(2).flat_map(char::to_uppercase).collect()
}

/// Prefixes the backend origin onto relative media URLs.
pub fn resolve_media_url(origin: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), url.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_day_french() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_day(date), "05 mars 2025");
        assert_eq!(format_month(2024, 12), "déc. 2024");
    }

    #[test]
    fn test_format_day_time() {
        let ts = Utc.with_ymd_and_hms(2025, 2, 14, 20, 45, 0).unwrap();
        assert_eq!(format_day_time(ts), "14 févr. 2025 à 20:45");
    }

    #[test]
    fn test_format_capacity() {
        assert_eq!(format_capacity(0), "0");
        assert_eq!(format_capacity(999), "999");
        assert_eq!(format_capacity(45000), "45 000");
        assert_eq!(format_capacity(1234567), "1 234 567");
    }

    #[test]
    fn test_initials_and_urls() {
        assert_eq!(initials("raja"), "RA");
        assert_eq!(initials("é"), "É");
        assert_eq!(
            resolve_media_url("http://localhost:1337", "/uploads/thumbnail_raja.png"),
            "http://localhost:1337/uploads/thumbnail_raja.png"
        );
        assert_eq!(
            resolve_media_url("http://localhost:1337", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_unparseable_dates_render_verbatim() {
        assert_eq!(format_date_text("bientôt"), "bientôt");
        assert_eq!(format_date_range("2024-08-16", "2025-05-25"), "16 août 2024 - 25 mai 2025");
    }
}
