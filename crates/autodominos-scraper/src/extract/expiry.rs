use std::sync::LazyLock;

use autodominos_core::remove_accents;
use chrono::NaiveDate;
use regex::Regex;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid regex"));

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4}|\d{2})\b").expect("valid regex")
});

static LONG_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s+(?:de\s+)?([a-z]+)\s+(?:de(?:l)?\s+)?(\d{4})\b")
        .expect("valid regex")
});

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

fn normalize(text: &str) -> String {
    let lowered = remove_accents(text).to_lowercase();
    lowered
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | ')'))
        .trim()
        .to_owned()
}

/// A date-shaped match: where it starts in the normalized text and the date
/// it spells, if that date exists on the calendar.
struct Candidate {
    start: usize,
    date: Option<NaiveDate>,
}

fn iso_candidates(text: &str) -> impl Iterator<Item = Candidate> + '_ {
    ISO_DATE.captures_iter(text).map(|caps| Candidate {
        start: caps.get(0).map_or(0, |m| m.start()),
        date: NaiveDate::from_ymd_opt(
            caps[1].parse().unwrap_or_default(),
            caps[2].parse().unwrap_or_default(),
            caps[3].parse().unwrap_or_default(),
        ),
    })
}

fn numeric_candidates(text: &str) -> impl Iterator<Item = Candidate> + '_ {
    NUMERIC_DATE.captures_iter(text).map(|caps| {
        let year: i32 = caps[3].parse().unwrap_or_default();
        let year = if caps[3].len() == 2 { 2000 + year } else { year };
        Candidate {
            start: caps.get(0).map_or(0, |m| m.start()),
            date: NaiveDate::from_ymd_opt(
                year,
                caps[2].parse().unwrap_or_default(),
                caps[1].parse().unwrap_or_default(),
            ),
        }
    })
}

/// Only matches whose middle word is a month name count; "2 por 2025" is
/// not a date.
fn long_candidates(text: &str) -> impl Iterator<Item = Candidate> + '_ {
    LONG_DATE.captures_iter(text).filter_map(|caps| {
        let month = month_number(&caps[2])?;
        Some(Candidate {
            start: caps.get(0).map_or(0, |m| m.start()),
            date: NaiveDate::from_ymd_opt(
                caps[3].parse().unwrap_or_default(),
                month,
                caps[1].parse().unwrap_or_default(),
            ),
        })
    })
}

/// Parses a promotion expiry text into a calendar date.
///
/// The text is normalized first (accents removed, lower-cased, trailing
/// punctuation dropped). Accepted forms: `2024-12-31`, `31/12/2024`,
/// `31-12-24`, `31.12.2024`, and `31 de diciembre de 2024`.
///
/// The expiry is the last date in the text, so a range such as
/// `del 01/12/2024 al 31/12/2024` yields its end. If that last date does not
/// exist (`31/02/2024`) the result is `None`; earlier dates are never used
/// in its place.
#[must_use]
pub fn parse_expiry(text: &str) -> Option<NaiveDate> {
    let text = normalize(text);

    iso_candidates(&text)
        .chain(numeric_candidates(&text))
        .chain(long_candidates(&text))
        .max_by_key(|candidate| candidate.start)
        .and_then(|candidate| candidate.date)
}
