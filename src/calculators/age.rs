// 🎂 Age Calculator - exact age, life totals, next birthday and zodiac sign

use crate::error::{CalcError, CalcResult};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "Age";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeInput {
    pub birth_date: NaiveDate,
    /// Age is measured on this date; today when absent
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zodiac {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeResult {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_months: u32,
    pub total_days: i64,
    pub total_hours: i64,
    pub total_minutes: i64,
    pub next_birthday: NaiveDate,
    /// Zero when the target date is the birthday
    pub days_until_birthday: i64,
    pub zodiac: Zodiac,
}

impl AgeInput {
    pub fn new(birth_date: NaiveDate) -> Self {
        AgeInput {
            birth_date,
            target_date: None,
        }
    }

    pub fn on(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }
}

/// Accepts ISO dates as well as day-first forms
pub fn parse_date(field: &str, text: &str) -> CalcResult<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CalcError::Missing {
            field: field.to_string(),
        });
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| CalcError::InvalidDate(format!("Could not read '{}' as a date", text)))
}

pub fn calculate(input: &AgeInput) -> CalcResult<AgeResult> {
    let target = input
        .target_date
        .unwrap_or_else(|| Local::now().date_naive());
    age_on(input.birth_date, target)
}

pub fn age_on(birth: NaiveDate, target: NaiveDate) -> CalcResult<AgeResult> {
    if birth > target {
        return Err(CalcError::InvalidDate("Birth date cannot be in the future".to_string())
            .in_calculator(CALCULATOR));
    }

    let (total_months, days) = months_and_days(birth, target)?;

    let total_days = (target - birth).num_days();
    let next_birthday = next_birthday(birth, target)?;

    debug!(%birth, %target, total_months, days, "age calculated");

    Ok(AgeResult {
        years: total_months / 12,
        months: total_months % 12,
        days,
        total_months,
        total_days,
        total_hours: total_days * 24,
        total_minutes: total_days * 24 * 60,
        next_birthday,
        days_until_birthday: (next_birthday - target).num_days(),
        zodiac: zodiac_sign(birth.month(), birth.day()),
    })
}

/// Field-wise difference: a negative day count borrows the length of the
/// month before the target month, a negative month count borrows a year.
/// When borrowing still leaves negative days (Jan 31 to Mar 1 in a common
/// year) the count falls back to the last clamped month anniversary.
fn months_and_days(birth: NaiveDate, target: NaiveDate) -> CalcResult<(u32, u32)> {
    let mut months = (target.year() - birth.year()) * 12 + target.month() as i32 - birth.month() as i32;
    let mut days = target.day() as i32 - birth.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(target)?;
    }

    if days >= 0 {
        return Ok((months.max(0) as u32, days as u32));
    }

    let (months, anniversary) = whole_months_between(birth, target)?;
    Ok((months, (target - anniversary).num_days() as u32))
}

fn days_in_previous_month(date: NaiveDate) -> CalcResult<i32> {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day() as i32)
        .ok_or_else(|| CalcError::InvalidDate("Date is out of range".to_string()).in_calculator(CALCULATOR))
}

/// Largest month count whose anniversary falls on or before `target`.
/// Anniversaries past a short month's end clamp to its last day.
fn whole_months_between(birth: NaiveDate, target: NaiveDate) -> CalcResult<(u32, NaiveDate)> {
    let span = (target.year() - birth.year()) * 12 + target.month() as i32 - birth.month() as i32;
    let mut months = span.max(0) as u32;

    loop {
        let anniversary = add_months(birth, months)?;
        if anniversary <= target || months == 0 {
            return Ok((months, anniversary));
        }
        months -= 1;
    }
}

fn add_months(date: NaiveDate, months: u32) -> CalcResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| CalcError::InvalidDate("Date is out of range".to_string()).in_calculator(CALCULATOR))
}

/// Feb 29 birthdays are observed on Mar 1 in common years
fn birthday_in(birth: NaiveDate, year: i32) -> CalcResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .ok_or_else(|| CalcError::InvalidDate("Date is out of range".to_string()).in_calculator(CALCULATOR))
}

pub fn next_birthday(birth: NaiveDate, target: NaiveDate) -> CalcResult<NaiveDate> {
    let this_year = birthday_in(birth, target.year())?;
    if this_year >= target {
        Ok(this_year)
    } else {
        birthday_in(birth, target.year() + 1)
    }
}

// ============================================================================
// ZODIAC
// ============================================================================

/// (name, symbol, last month, last day) in calendar order from January
const ZODIAC_SIGNS: [(&str, &str, u32, u32); 12] = [
    ("Capricorn", "♑", 1, 19),
    ("Aquarius", "♒", 2, 18),
    ("Pisces", "♓", 3, 20),
    ("Aries", "♈", 4, 19),
    ("Taurus", "♉", 5, 20),
    ("Gemini", "♊", 6, 20),
    ("Cancer", "♋", 7, 22),
    ("Leo", "♌", 8, 22),
    ("Virgo", "♍", 9, 22),
    ("Libra", "♎", 10, 22),
    ("Scorpio", "♏", 11, 21),
    ("Sagittarius", "♐", 12, 21),
];

pub fn zodiac_sign(month: u32, day: u32) -> Zodiac {
    let (name, symbol) = ZODIAC_SIGNS
        .iter()
        .find(|(_, _, end_month, end_day)| month == *end_month && day <= *end_day)
        .or_else(|| {
            // Past the sign ending this month: the sign ending next month
            ZODIAC_SIGNS
                .iter()
                .find(|(_, _, end_month, _)| *end_month == month % 12 + 1)
        })
        .map(|(name, symbol, _, _)| (*name, *symbol))
        .unwrap_or(("Capricorn", "♑"));

    Zodiac {
        name: name.to_string(),
        symbol: symbol.to_string(),
    }
}
