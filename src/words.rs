// 🔤 Amount in words - Indian numbering system
// 12,50,000.50 → "Twelve Lakh Fifty Thousand Rupees and Fifty Paise"

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const TEENS: [&str; 10] = [
    "Ten", "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen",
    "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const DIGITS: [&str; 10] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

// ============================================================================
// WORD STYLE
// ============================================================================

/// How the number is read out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStyle {
    /// "… Rupees and … Paise"
    Currency,
    /// "… Point …"
    Decimal,
    /// "… Percent"
    Percentage,
    Years,
    Months,
    Days,
    /// Any other unit, appended after the number ("Litres", "Grams")
    Unit(String),
}

impl FromStr for WordStyle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "" | "currency" | "rupees" | "inr" => WordStyle::Currency,
            "decimal" | "number" => WordStyle::Decimal,
            "percentage" | "percent" => WordStyle::Percentage,
            "year" | "years" => WordStyle::Years,
            "month" | "months" => WordStyle::Months,
            "day" | "days" => WordStyle::Days,
            _ => WordStyle::Unit(capitalize(s.trim())),
        })
    }
}

impl fmt::Display for WordStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordStyle::Currency => write!(f, "currency"),
            WordStyle::Decimal => write!(f, "decimal"),
            WordStyle::Percentage => write!(f, "percentage"),
            WordStyle::Years => write!(f, "years"),
            WordStyle::Months => write!(f, "months"),
            WordStyle::Days => write!(f, "days"),
            WordStyle::Unit(unit) => write!(f, "{}", unit),
        }
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Spell out `value` in the given style. Non-finite input yields an empty string.
pub fn number_to_words(value: f64, style: &WordStyle) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let scaled = (value.abs() * 100.0).round();
    let integer = (scaled / 100.0).trunc() as u64;
    let fraction = (scaled - integer as f64 * 100.0).round() as u64;
    let (integer, fraction) = if fraction >= 100 {
        (integer + 1, fraction - 100)
    } else {
        (integer, fraction)
    };

    if integer == 0 && fraction == 0 {
        return zero_words(style);
    }

    let words = spell(integer, fraction, style);
    if value < 0.0 {
        format!("Minus {}", words)
    } else {
        words
    }
}

/// Shorthand for currency amounts
pub fn rupees_in_words(amount: f64) -> String {
    number_to_words(amount, &WordStyle::Currency)
}

/// Words for a whole number, Indian scales
pub fn integer_to_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    let crores = n / CRORE;
    if crores > 0 {
        // Crore counts above 99 recurse: "One Lakh Crore"
        parts.push(format!("{} Crore", integer_to_words(crores)));
    }

    let rest = n % CRORE;
    let lakhs = rest / LAKH;
    if lakhs > 0 {
        parts.push(format!("{} Lakh", below_thousand(lakhs)));
    }

    let thousands = (rest % LAKH) / THOUSAND;
    if thousands > 0 {
        parts.push(format!("{} Thousand", below_thousand(thousands)));
    }

    let hundreds = rest % THOUSAND;
    if hundreds > 0 {
        parts.push(below_thousand(hundreds));
    }

    parts.join(" ")
}

fn spell(integer: u64, fraction: u64, style: &WordStyle) -> String {
    let integer_words = integer_to_words(integer);

    match style {
        WordStyle::Currency => {
            if fraction > 0 {
                format!("{} Rupees and {} Paise", integer_words, below_thousand(fraction))
            } else {
                format!("{} Rupees", integer_words)
            }
        }
        WordStyle::Decimal => with_point(integer_words, fraction),
        WordStyle::Percentage => format!("{} Percent", with_point(integer_words, fraction)),
        WordStyle::Years => counted(integer, integer_words, "Year"),
        WordStyle::Months => counted(integer, integer_words, "Month"),
        WordStyle::Days => counted(integer, integer_words, "Day"),
        WordStyle::Unit(unit) => format!("{} {}", with_point(integer_words, fraction), unit),
    }
}

fn zero_words(style: &WordStyle) -> String {
    match style {
        WordStyle::Currency => "Zero Rupees".to_string(),
        WordStyle::Decimal => "Zero".to_string(),
        WordStyle::Percentage => "Zero Percent".to_string(),
        WordStyle::Years => "Zero Years".to_string(),
        WordStyle::Months => "Zero Months".to_string(),
        WordStyle::Days => "Zero Days".to_string(),
        WordStyle::Unit(unit) => format!("Zero {}", unit),
    }
}

fn counted(integer: u64, words: String, singular: &str) -> String {
    if integer == 1 {
        format!("{} {}", words, singular)
    } else {
        format!("{} {}s", words, singular)
    }
}

/// Fraction digits are read one by one, trailing zeros dropped
fn with_point(integer_words: String, fraction: u64) -> String {
    if fraction == 0 {
        return integer_words;
    }

    let digits = format!("{:02}", fraction);
    let spoken: Vec<&str> = digits
        .trim_end_matches('0')
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect();

    format!("{} Point {}", integer_words, spoken.join(" "))
}

fn below_thousand(n: u64) -> String {
    let mut words: Vec<&str> = Vec::new();
    let mut n = n % 1000;

    if n >= 100 {
        words.push(ONES[(n / 100) as usize]);
        words.push("Hundred");
        n %= 100;
    }

    if n >= 20 {
        words.push(TENS[(n / 10) as usize]);
        n %= 10;
    } else if n >= 10 {
        words.push(TEENS[(n - 10) as usize]);
        n = 0;
    }

    if n > 0 {
        words.push(ONES[n as usize]);
    }

    words.join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(integer_to_words(7), "Seven");
        assert_eq!(integer_to_words(13), "Thirteen");
        assert_eq!(integer_to_words(40), "Forty");
        assert_eq!(integer_to_words(99), "Ninety Nine");
        assert_eq!(integer_to_words(305), "Three Hundred Five");
    }

    #[test]
    fn test_indian_scales() {
        assert_eq!(integer_to_words(1_000), "One Thousand");
        assert_eq!(integer_to_words(1_00_000), "One Lakh");
        assert_eq!(
            integer_to_words(12_34_567),
            "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven"
        );
        assert_eq!(integer_to_words(5_00_00_000), "Five Crore");
        assert_eq!(integer_to_words(1_00_000 * CRORE), "One Lakh Crore");
    }

    #[test]
    fn test_currency_words() {
        assert_eq!(rupees_in_words(0.0), "Zero Rupees");
        assert_eq!(rupees_in_words(1.0), "One Rupees");
        assert_eq!(
            rupees_in_words(12_50_000.5),
            "Twelve Lakh Fifty Thousand Rupees and Fifty Paise"
        );
        assert_eq!(rupees_in_words(0.75), "Zero Rupees and Seventy Five Paise");
    }

    #[test]
    fn test_decimal_and_percentage() {
        assert_eq!(number_to_words(22.5, &WordStyle::Decimal), "Twenty Two Point Five");
        assert_eq!(number_to_words(3.05, &WordStyle::Decimal), "Three Point Zero Five");
        assert_eq!(
            number_to_words(12.75, &WordStyle::Percentage),
            "Twelve Point Seven Five Percent"
        );
        assert_eq!(number_to_words(0.0, &WordStyle::Percentage), "Zero Percent");
        assert_eq!(number_to_words(0.0, &WordStyle::Decimal), "Zero");
    }

    #[test]
    fn test_periods() {
        assert_eq!(number_to_words(1.0, &WordStyle::Years), "One Year");
        assert_eq!(number_to_words(30.0, &WordStyle::Years), "Thirty Years");
        assert_eq!(number_to_words(1.0, &WordStyle::Months), "One Month");
        assert_eq!(number_to_words(2.0, &WordStyle::Days), "Two Days");
    }

    #[test]
    fn test_units_and_negatives() {
        let litres: WordStyle = "litres".parse().unwrap();
        assert_eq!(number_to_words(12.5, &litres), "Twelve Point Five Litres");
        assert_eq!(number_to_words(-250.0, &WordStyle::Currency), "Minus Two Hundred Fifty Rupees");
        assert_eq!(number_to_words(f64::NAN, &WordStyle::Currency), "");
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("percent".parse::<WordStyle>().unwrap(), WordStyle::Percentage);
        assert_eq!("".parse::<WordStyle>().unwrap(), WordStyle::Currency);
        assert_eq!("Day".parse::<WordStyle>().unwrap(), WordStyle::Days);
    }
}
