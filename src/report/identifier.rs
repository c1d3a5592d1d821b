//! Leave ID derivation.
//!
//! The ID is built from the tails of the national ID and both dates. It is
//! deterministic and collisions between records with identical tails are
//! accepted; remote systems match on this exact scheme.

pub const ID_PREFIX: &str = "PSL";
pub const ID_DIGITS: usize = 11;

fn tail(text: &str, n: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars[chars.len().saturating_sub(n)..].iter().collect()
}

fn digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `PSL` followed by last 4 of the national ID, last 3 admission digits and
/// last 4 discharge digits, right-padded with `0` and cut to 11 characters.
pub fn generate_id(national_id: &str, admission: &str, discharge: &str) -> String {
    let mut number = tail(national_id, 4);
    number.push_str(&tail(&digits(admission), 3));
    number.push_str(&tail(&digits(discharge), 4));

    let mut number: String = number.chars().take(ID_DIGITS).collect();
    while number.chars().count() < ID_DIGITS {
        number.push('0');
    }

    format!("{ID_PREFIX}{number}")
}

/// True for `PSL` followed by exactly 11 ASCII digits.
pub fn is_valid_id(id: &str) -> bool {
    id.strip_prefix(ID_PREFIX)
        .map(|rest| rest.len() == ID_DIGITS && rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
