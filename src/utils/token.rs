use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, seq::SliceRandom, thread_rng, Rng};

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*";

pub const PASSWORD_LENGTH: usize = 12;

/// `ADM`, the last six digits of the millisecond clock, then three random
/// uppercase alphanumerics.
pub fn generate_admin_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().unsigned_abs() % 1_000_000;
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(3)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("ADM{:06}{}", millis, suffix)
}

/// A shuffled password with at least one uppercase letter, lowercase letter,
/// digit and special character.
pub fn generate_password() -> String {
    let mut rng = thread_rng();
    let charset: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();

    let mut bytes: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL]
        .iter()
        .filter_map(|class| class.choose(&mut rng).copied())
        .collect();
    while bytes.len() < PASSWORD_LENGTH {
        if let Some(b) = charset.choose(&mut rng) {
            bytes.push(*b);
        }
    }
    bytes.shuffle(&mut rng);
    bytes.into_iter().map(char::from).collect()
}
