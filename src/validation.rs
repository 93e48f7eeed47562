use lazy_static::lazy_static;
use regex::Regex;

/// Phone rule shared by registration and OTP issuance:
/// exactly 9 digits, first digit 7 (local mobile numbers).
pub fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^7\d{8}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}
