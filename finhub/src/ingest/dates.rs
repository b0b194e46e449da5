//! Purchase-date resolution: the extractor's date, then the email's own
//! `Date` header, then the processing time.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

const EARLIEST_YEAR: i32 = 1900;
/// Mail headers predate nothing earlier than this.
const EARLIEST_HEADER_YEAR: i32 = 1980;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn strict_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid strict date regex"))
}

fn short_us_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2})$").expect("invalid short date regex")
    })
}

fn short_dotted_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{2})$").expect("invalid dotted date regex")
    })
}

/// Where a resolved purchase date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Extracted,
    EmailHeader,
    ProcessingTime,
}

pub fn resolve_purchase_date(
    extracted: Option<&str>,
    email_date: Option<&str>,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateSource) {
    if let Some(date) = extracted.and_then(|raw| parse_purchase_date(raw, now.date_naive())) {
        return (date, DateSource::Extracted);
    }
    if let Some(raw) = extracted {
        tracing::debug!(raw, "Unparseable purchase date, falling back");
    }
    if let Some(date) = email_date.and_then(parse_email_date) {
        return (date, DateSource::EmailHeader);
    }
    (now, DateSource::ProcessingTime)
}

/// Strict `YYYY-MM-DD` first, then a set of common layouts. Dates without a
/// time are midnight UTC.
pub fn parse_purchase_date(raw: &str, today: NaiveDate) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if strict_date_re().is_match(raw) {
        // A well-formed but impossible date (2024-02-30) is not re-guessed.
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(midnight_utc);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return plausible(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return plausible(dt.with_timezone(&Utc));
    }

    if let Some(date) = parse_two_digit_year(raw, today) {
        return midnight_utc(date);
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return plausible(dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return midnight_utc(date);
        }
    }

    None
}

/// `MM/DD/YY`, `MM-DD-YY` and `DD.MM.YY`. Years up to ten past the current
/// two-digit year land in this century, later ones in the previous.
fn parse_two_digit_year(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (month, day, yy) = if let Some(caps) = short_us_date_re().captures(raw) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse::<i32>().ok()?)
    } else if let Some(caps) = short_dotted_date_re().captures(raw) {
        (caps[2].parse().ok()?, caps[1].parse().ok()?, caps[3].parse::<i32>().ok()?)
    } else {
        return None;
    };

    let pivot = today.year() % 100 + 10;
    let century = today.year() - today.year() % 100;
    let year = if yy <= pivot { century + yy } else { century - 100 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The `Date` header of the email (RFC 2822, or RFC 3339 from some relays).
/// `mailparse` is the lenient last resort; it answers `0` for text it cannot
/// read, so anything before `EARLIEST_HEADER_YEAR` is treated as unparseable.
pub fn parse_email_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return header_plausible(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return header_plausible(dt.with_timezone(&Utc));
    }
    mailparse::dateparse(raw)
        .ok()
        .filter(|ts| *ts > 0)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .and_then(header_plausible)
}

fn header_plausible(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (dt.year() >= EARLIEST_HEADER_YEAR).then_some(dt)
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    plausible(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn plausible(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (dt.year() >= EARLIEST_YEAR).then_some(dt)
}
