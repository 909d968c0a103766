use regex::Regex;
use std::sync::OnceLock;

pub const PHONE_DIGITS: usize = 10;

/// Keeps the digits of a phone input, at most ten of them.
pub fn phone_digits(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

pub fn is_valid_email(raw: &str) -> bool {
    email_re().is_match(raw.trim())
}
