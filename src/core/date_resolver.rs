//! Turns relative and absolute date tokens into a calendar date.
//!
//! Recognition is a case-insensitive substring search over the whole input,
//! first match wins:
//!
//! 1. `today`, `yesterday`, `tomorrow`
//! 2. the first run of six digits, read as `MMDDYY`
//! 3. the first `YYYY-MM-DD`
//!
//! A numeric run that is not a real calendar date is ignored and recognition
//! moves on. Only the first six-digit run is ever considered, so a query that
//! carries another six-digit number ahead of the date is resolved from that
//! number.

use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static COMPACT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{6}").expect("valid compact date pattern"));

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid ISO date pattern")
});

/// A recognized date together with the token that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch<'a> {
    pub date: NaiveDate,
    pub token: &'a str,
}

/// Recognizes a date token in already lower-cased `text`.
pub fn recognize(text: &str, today: NaiveDate) -> Option<DateMatch<'_>> {
    if text.contains("today") {
        return Some(DateMatch {
            date: today,
            token: "today",
        });
    }
    if text.contains("yesterday") {
        return today.checked_sub_days(Days::new(1)).map(|date| DateMatch {
            date,
            token: "yesterday",
        });
    }
    if text.contains("tomorrow") {
        return today.checked_add_days(Days::new(1)).map(|date| DateMatch {
            date,
            token: "tomorrow",
        });
    }

    if let Some(m) = COMPACT_DATE.find(text) {
        if let Some(date) = parse_mmddyy(m.as_str()) {
            return Some(DateMatch {
                date,
                token: m.as_str(),
            });
        }
        tracing::debug!("Ignoring '{}': not a valid MMDDYY date", m.as_str());
    }

    if let Some(caps) = ISO_DATE.captures(text) {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if year >= 1 {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(DateMatch { date, token: whole });
            }
        }
        tracing::debug!("Ignoring '{}': not a valid ISO date", whole);
    }

    None
}

/// Resolves `text` to a date, defaulting to `today`.
pub fn resolve(text: &str, today: NaiveDate) -> NaiveDate {
    recognize(&text.to_lowercase(), today).map_or(today, |m| m.date)
}

/// Two-digit years pivot at 69: `00..=68` is 20xx, `69..=99` is 19xx.
fn parse_mmddyy(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: u32 = digits[0..2].parse().ok()?;
    let day: u32 = digits[2..4].parse().ok()?;
    let yy: i32 = digits[4..6].parse().ok()?;
    let year = if yy <= 68 { 2000 + yy } else { 1900 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}
