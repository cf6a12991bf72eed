use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL: Regex = Regex::new(r"^(?i)https?://[^\s/?#.][^\s/?#]*(?:[/?#]\S*)?$")
        .expect("url pattern is valid");
    static ref EMAIL: Regex =
        Regex::new(r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)+$").expect("email pattern is valid");
    static ref PHONE_NUMBER: Regex =
        Regex::new(r"^\+?[0-9 ()./-]+(?:\s*(?:x|ext\.?)\s*[0-9]{1,6})?$")
            .expect("phone number pattern is valid");
}

/// Format rules for the values that are kept even when they are invalid
///
/// The [crate::RowParser] emits a notice when a rule rejects a value, but still returns it.
pub trait FieldValidator: Send + Sync {
    fn validate_url(&self, url: &str) -> bool;
    fn validate_email(&self, email: &str) -> bool;
    fn validate_phone_number(&self, phone_number: &str) -> bool;
    /// Identifiers should be made of printable ASCII characters
    fn validate_id(&self, id: &str) -> bool {
        id.chars().all(|c| (' '..='~').contains(&c))
    }
}

/// Rules used when nothing else is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldValidator;

impl FieldValidator for DefaultFieldValidator {
    fn validate_url(&self, url: &str) -> bool {
        URL.is_match(url)
    }

    fn validate_email(&self, email: &str) -> bool {
        EMAIL.is_match(email)
    }

    fn validate_phone_number(&self, phone_number: &str) -> bool {
        if !PHONE_NUMBER.is_match(phone_number) {
            return false;
        }
        // the extension is not part of the number itself
        let number = phone_number
            .split(|c: char| c == 'x' || c == 'e')
            .next()
            .unwrap_or_default();
        let digits = number.chars().filter(char::is_ascii_digit).count();
        (3..=20).contains(&digits)
    }
}
