// 💱 Display formatting - Indian digit grouping (en-IN)
// 1234567.891 → "12,34,567.89", currency as "₹12,34,567.89"

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Group a string of integer digits the Indian way: last three, then pairs.
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Fixed decimals with Indian grouping. Negative zero prints as zero.
pub fn format_number(value: f64, decimals: usize) -> String {
    let rounded = round_to(value.abs(), decimals as u32);
    let text = format!("{:.*}", decimals, rounded);

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let sign = if value < 0.0 && rounded != 0.0 { "-" } else { "" };
    let grouped = group_indian(int_part);

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// "₹1,23,456.78"
pub fn format_currency(value: f64) -> String {
    with_rupee_sign(value, format_number(value.abs(), 2))
}

/// "₹1,23,457" (whole rupees)
pub fn format_rupees(value: f64) -> String {
    with_rupee_sign(value, format_number(value.abs(), 0))
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{}%", format_number(value, decimals))
}

fn with_rupee_sign(value: f64, body: String) -> String {
    if value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-₹{}", body)
    } else {
        format!("₹{}", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian("1"), "1");
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1000"), "1,000");
        assert_eq!(group_indian("100000"), "1,00,000");
        assert_eq!(group_indian("12345678"), "1,23,45,678");
        assert_eq!(group_indian("1234567890"), "1,23,45,67,890");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "12,34,567.89");
        assert_eq!(format_number(0.5, 0), "1");
        assert_eq!(format_number(-1500.0, 2), "-1,500.00");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(22.5, 1), "22.5");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(123456.78), "₹1,23,456.78");
        assert_eq!(format_currency(0.0), "₹0.00");
        assert_eq!(format_currency(-2500.0), "-₹2,500.00");
        assert_eq!(format_rupees(1234567.6), "₹12,34,568");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(2.35, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(24.96, 1), 25.0);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.5, 2), "12.50%");
    }
}
