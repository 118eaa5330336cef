//! Canonical forms for user-supplied identifiers.
//!
//! Emails are compared and stored trimmed and lower-cased, phones as bare
//! digits. Uniqueness checks and lookups must go through these functions so
//! that `" Ana@X.com"` and `"ana@x.com"` name the same account.

/// Phone numbers are stored with area code: 10 digits for landlines,
/// 11 for mobiles.
pub const PHONE_DIGIT_COUNTS: [usize; 2] = [10, 11];

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Strips every non-digit character.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True when the phone has 10 or 11 digits once formatting is removed.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_DIGIT_COUNTS.contains(&normalize_phone(phone).len())
}

/// Blank CPF values are treated as absent.
pub fn normalize_cpf(cpf: Option<&str>) -> Option<String> {
    cpf.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
