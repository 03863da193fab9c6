//! Timex parsing and normalization for the date slot.
//!
//! Supports the expressions users actually type at the date prompt:
//! - Absolute dates: "2024-03-04", "3/4/2024", "March 4, 2024"
//! - Month/day without a year: "March 4"
//! - Relative dates: "today", "tomorrow", "next Tuesday", "in 2 weeks"
//! - Date ranges: "from March 4 to March 8, 2024"
//! - Recurring patterns: "every Monday"
//!
//! An expression is *definite* only when it names one specific calendar
//! date. Everything else (relative, recurring, ranges, unparseable input)
//! counts as ambiguous and sends the flow through the date resolver.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimexKind {
    Definite,
    Relative,
    Range,
    Recurring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimexValue {
    Date(NaiveDate),
    MonthDay { month: u32, day: u32 },
    DaysFromReference(i64),
    ComingWeekday(Weekday),
    Range { start: Box<TimexExpression>, end: Box<TimexExpression> },
    EveryWeekday(Weekday),
}

/// A parsed temporal expression plus its ambiguity classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimexExpression {
    original: String,
    kind: TimexKind,
    value: TimexValue,
}

/// A timex resolved against a reference date: one concrete date or a
/// concrete range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedTimex {
    Date(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl ResolvedTimex {
    /// Canonical textual form: `2024-03-04` for dates, timex-style
    /// `(2024-03-04,2024-03-08,P4D)` for ranges.
    pub fn normalized(&self) -> String {
        match self {
            ResolvedTimex::Date(date) => date.format("%Y-%m-%d").to_string(),
            ResolvedTimex::Range { start, end } => {
                let span_days = (*end - *start).num_days();
                format!("({},{},P{}D)", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"), span_days)
            }
        }
    }
}

impl TimexExpression {
    pub fn parse(text: &str) -> Option<TimexExpression> {
        let normalized = text.trim().trim_end_matches(['.', '!', '?']).to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }

        let value = parse_range(&normalized)
            .or_else(|| parse_recurring(&normalized))
            .or_else(|| parse_relative(&normalized))
            .or_else(|| parse_absolute(&normalized))?;

        Some(TimexExpression { original: text.trim().to_string(), kind: kind_of(&value), value })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn kind(&self) -> TimexKind {
        self.kind
    }

    pub fn is_definite(&self) -> bool {
        self.kind == TimexKind::Definite
    }

    /// Resolve against a reference date. Recurring expressions have no single
    /// resolution and return `None`.
    pub fn resolve(&self, reference: NaiveDate) -> Option<ResolvedTimex> {
        match &self.value {
            TimexValue::Date(date) => Some(ResolvedTimex::Date(*date)),
            TimexValue::MonthDay { month, day } => {
                next_month_day(reference, *month, *day).map(ResolvedTimex::Date)
            }
            TimexValue::DaysFromReference(days) => {
                Some(ResolvedTimex::Date(reference + Duration::days(*days)))
            }
            TimexValue::ComingWeekday(weekday) => {
                Some(ResolvedTimex::Date(coming_weekday(reference, *weekday)))
            }
            TimexValue::Range { start, end } => {
                let start = match start.resolve(reference)? {
                    ResolvedTimex::Date(date) => date,
                    ResolvedTimex::Range { .. } => return None,
                };
                let end = match end.resolve(reference)? {
                    ResolvedTimex::Date(date) => date,
                    ResolvedTimex::Range { .. } => return None,
                };
                if end < start {
                    return None;
                }
                Some(ResolvedTimex::Range { start, end })
            }
            TimexValue::EveryWeekday(_) => None,
        }
    }
}

/// The date-slot ambiguity rule: ambiguous unless the string parses to a
/// definite expression. Unparseable input is ambiguous by default.
pub fn is_ambiguous(text: &str) -> bool {
    TimexExpression::parse(text).map(|timex| !timex.is_definite()).unwrap_or(true)
}

fn kind_of(value: &TimexValue) -> TimexKind {
    match value {
        TimexValue::Date(_) => TimexKind::Definite,
        TimexValue::MonthDay { .. }
        | TimexValue::DaysFromReference(_)
        | TimexValue::ComingWeekday(_) => TimexKind::Relative,
        TimexValue::Range { .. } => TimexKind::Range,
        TimexValue::EveryWeekday(_) => TimexKind::Recurring,
    }
}

fn parse_range(text: &str) -> Option<TimexValue> {
    let pattern = Regex::new(r"^(?:from\s+)?(.+?)\s+(?:to|until|through)\s+(.+)$")
        .expect("valid range pattern");
    let captures = pattern.captures(text)?;

    let start = TimexExpression::parse(&captures[1])?;
    let end = TimexExpression::parse(&captures[2])?;
    if matches!(start.value, TimexValue::Range { .. } | TimexValue::EveryWeekday(_))
        || matches!(end.value, TimexValue::Range { .. } | TimexValue::EveryWeekday(_))
    {
        return None;
    }

    Some(TimexValue::Range { start: Box::new(start), end: Box::new(end) })
}

fn parse_recurring(text: &str) -> Option<TimexValue> {
    let pattern =
        Regex::new(r"^(?:every|weekly on)\s+([a-z]+?)s?$").expect("valid recurring pattern");
    let captures = pattern.captures(text)?;
    let weekday = captures[1].parse::<Weekday>().ok()?;
    Some(TimexValue::EveryWeekday(weekday))
}

fn parse_relative(text: &str) -> Option<TimexValue> {
    match text {
        "today" => return Some(TimexValue::DaysFromReference(0)),
        "tomorrow" => return Some(TimexValue::DaysFromReference(1)),
        "yesterday" => return Some(TimexValue::DaysFromReference(-1)),
        _ => {}
    }

    if let Ok(weekday) = text.parse::<Weekday>() {
        return Some(TimexValue::ComingWeekday(weekday));
    }

    let weekday_pattern =
        Regex::new(r"^(?:next|this)\s+([a-z]+)$").expect("valid weekday pattern");
    if let Some(captures) = weekday_pattern.captures(text) {
        let weekday = captures[1].parse::<Weekday>().ok()?;
        return Some(TimexValue::ComingWeekday(weekday));
    }

    let offset_pattern =
        Regex::new(r"^in\s+(\d{1,3})\s+(day|days|week|weeks)$").expect("valid offset pattern");
    if let Some(captures) = offset_pattern.captures(text) {
        let amount = captures[1].parse::<i64>().ok()?;
        let days = match &captures[2] {
            unit if unit.starts_with("week") => amount.checked_mul(7)?,
            _ => amount,
        };
        return Some(TimexValue::DaysFromReference(days));
    }

    None
}

fn parse_absolute(text: &str) -> Option<TimexValue> {
    let iso_pattern = Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("valid iso pattern");
    if let Some(captures) = iso_pattern.captures(text) {
        let date = ymd(&captures[1], &captures[2], &captures[3])?;
        return Some(TimexValue::Date(date));
    }

    let slash_pattern = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid slash pattern");
    if let Some(captures) = slash_pattern.captures(text) {
        let date = ymd(&captures[3], &captures[1], &captures[2])?;
        return Some(TimexValue::Date(date));
    }

    let month_pattern = Regex::new(r"^([a-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?$")
        .expect("valid month pattern");
    if let Some(captures) = month_pattern.captures(text) {
        let month = month_number(&captures[1])?;
        let day = captures[2].parse::<u32>().ok()?;
        return match captures.get(3) {
            Some(year) => {
                let year = year.as_str().parse::<i32>().ok()?;
                NaiveDate::from_ymd_opt(year, month, day).map(TimexValue::Date)
            }
            None => valid_month_day(month, day).then_some(TimexValue::MonthDay { month, day }),
        };
    }

    let day_first_pattern = Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]+)(?:,?\s+(\d{4}))?$")
        .expect("valid day-first pattern");
    if let Some(captures) = day_first_pattern.captures(text) {
        let day = captures[1].parse::<u32>().ok()?;
        let month = month_number(&captures[2])?;
        return match captures.get(3) {
            Some(year) => {
                let year = year.as_str().parse::<i32>().ok()?;
                NaiveDate::from_ymd_opt(year, month, day).map(TimexValue::Date)
            }
            None => valid_month_day(month, day).then_some(TimexValue::MonthDay { month, day }),
        };
    }

    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    let day = day.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let months = [
        ("january", 1u32),
        ("february", 2),
        ("march", 3),
        ("april", 4),
        ("may", 5),
        ("june", 6),
        ("july", 7),
        ("august", 8),
        ("september", 9),
        ("october", 10),
        ("november", 11),
        ("december", 12),
    ];

    months
        .iter()
        .find(|(full, _)| *full == name || (name.len() >= 3 && full.starts_with(name)))
        .map(|(_, number)| *number)
}

fn valid_month_day(month: u32, day: u32) -> bool {
    // Validate against a leap year so Feb 29 stays representable.
    NaiveDate::from_ymd_opt(2024, month, day).is_some()
}

fn coming_weekday(reference: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = reference.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    reference + Duration::days(ahead)
}

fn next_month_day(reference: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    (0..=8).find_map(|offset| {
        let candidate = NaiveDate::from_ymd_opt(reference.year() + offset, month, day)?;
        (candidate >= reference).then_some(candidate)
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{is_ambiguous, ResolvedTimex, TimexExpression, TimexKind};

    fn reference() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 3, 6).expect("valid reference date")
    }

    fn resolve(text: &str) -> String {
        TimexExpression::parse(text)
            .and_then(|timex| timex.resolve(reference()))
            .map(|resolved| resolved.normalized())
            .unwrap_or_else(|| panic!("`{text}` should resolve"))
    }

    #[test]
    fn iso_dates_are_definite() {
        let timex = TimexExpression::parse("2024-03-04").expect("should parse");
        assert!(timex.is_definite());
        assert_eq!(resolve("2024-03-04"), "2024-03-04");
    }

    #[test]
    fn month_name_dates_are_definite() {
        let timex = TimexExpression::parse("March 4, 2024").expect("should parse");
        assert_eq!(timex.kind(), TimexKind::Definite);
        assert_eq!(resolve("March 4, 2024"), "2024-03-04");
        assert_eq!(resolve("4 Mar 2024"), "2024-03-04");
        assert_eq!(resolve("3/4/2024"), "2024-03-04");
    }

    #[test]
    fn month_day_without_year_is_relative_and_resolves_forward() {
        let timex = TimexExpression::parse("March 4").expect("should parse");
        assert_eq!(timex.kind(), TimexKind::Relative);
        // March 4 already passed relative to March 6, so it lands next year.
        assert_eq!(resolve("March 4"), "2025-03-04");
        assert_eq!(resolve("March 8"), "2024-03-08");
    }

    #[test]
    fn relative_keywords_resolve_against_reference() {
        assert_eq!(resolve("today"), "2024-03-06");
        assert_eq!(resolve("tomorrow"), "2024-03-07");
        assert_eq!(resolve("yesterday"), "2024-03-05");
        assert_eq!(resolve("in 2 weeks"), "2024-03-20");
        assert_eq!(resolve("in 3 days"), "2024-03-09");
    }

    #[test]
    fn weekdays_resolve_to_the_coming_occurrence() {
        assert_eq!(resolve("next friday"), "2024-03-08");
        assert_eq!(resolve("friday"), "2024-03-08");
        // Same weekday as the reference skips to next week.
        assert_eq!(resolve("wednesday"), "2024-03-13");
        assert!(is_ambiguous("next friday"));
    }

    #[test]
    fn ranges_normalize_to_timex_style_spans() {
        assert_eq!(resolve("from March 8 to March 12, 2024"), "(2024-03-08,2024-03-12,P4D)");
        assert_eq!(resolve("2024-03-04 to 2024-03-08"), "(2024-03-04,2024-03-08,P4D)");

        let timex = TimexExpression::parse("monday to friday").expect("should parse");
        assert_eq!(timex.kind(), TimexKind::Range);
        assert!(!timex.is_definite());
    }

    #[test]
    fn recurring_patterns_never_resolve() {
        let timex = TimexExpression::parse("every monday").expect("should parse");
        assert_eq!(timex.kind(), TimexKind::Recurring);
        assert!(timex.resolve(reference()).is_none());
    }

    #[test]
    fn ambiguity_rule_treats_unparseable_input_as_ambiguous() {
        assert!(is_ambiguous(""));
        assert!(is_ambiguous("whenever"));
        assert!(is_ambiguous("next monday"));
        assert!(!is_ambiguous("2024-03-04"));
    }

    #[test]
    fn range_normalization_counts_span_days() {
        let resolved = ResolvedTimex::Range {
            start: NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2024, 3, 8).expect("valid date"),
        };
        assert_eq!(resolved.normalized(), "(2024-03-04,2024-03-08,P4D)");
    }
}
