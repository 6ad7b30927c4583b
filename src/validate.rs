use crate::error::{AppError, Result};
use crate::models::{ContactMethod, NewMessage};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+()]+$").expect("valid phone pattern"));

const MIN_PHONE_DIGITS: usize = 10;

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value) && value.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

impl NewMessage {
    /// Checks the fields against the submission rules and returns the trimmed
    /// copy that should be stored. Emptiness is judged after trimming, but the
    /// contact format is checked on the value as typed, so a padded email is
    /// rejected.
    pub fn validated(&self) -> Result<NewMessage> {
        let recipient_name = self.recipient_name.trim();
        let message = self.message.trim();
        let contact_value = self.contact_value.trim();

        if recipient_name.is_empty() {
            return Err(AppError::Validation("Please enter the recipient's name".to_string()));
        }
        if message.is_empty() {
            return Err(AppError::Validation("Please write a message".to_string()));
        }
        if contact_value.is_empty() {
            let what = match self.contact_method {
                ContactMethod::Email => "an email",
                ContactMethod::Phone => "a phone number",
            };
            return Err(AppError::Validation(format!("Please enter {}", what)));
        }

        match self.contact_method {
            ContactMethod::Email if !is_valid_email(&self.contact_value) => {
                return Err(AppError::Validation("Please enter a valid email address".to_string()));
            }
            ContactMethod::Phone if !is_valid_phone(&self.contact_value) => {
                return Err(AppError::Validation("Please enter a valid phone number".to_string()));
            }
            _ => {}
        }

        Ok(NewMessage {
            recipient_name: recipient_name.to_string(),
            message: message.to_string(),
            contact_method: self.contact_method,
            contact_value: contact_value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(method: ContactMethod, value: &str) -> NewMessage {
        NewMessage {
            recipient_name: "Sam".to_string(),
            message: "hi".to_string(),
            contact_method: method,
            contact_value: value.to_string(),
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@mail.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(is_valid_phone("555-123-4567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("555-123-456x"));
        assert!(!is_valid_phone("call me maybe"));
    }

    #[test]
    fn test_validated_trims_fields() {
        let input = NewMessage {
            recipient_name: "  Sam ".to_string(),
            message: "\nhi there\n".to_string(),
            contact_method: ContactMethod::Email,
            contact_value: "user@example.com".to_string(),
        };
        let clean = input.validated().unwrap();
        assert_eq!(clean.recipient_name, "Sam");
        assert_eq!(clean.message, "hi there");
        assert_eq!(clean.contact_value, "user@example.com");
    }

    #[test]
    fn test_validated_rejects_blank_fields() {
        let mut input = draft(ContactMethod::Phone, "555-123-4567");
        input.recipient_name = "   ".to_string();
        let err = input.validated().unwrap_err();
        assert_eq!(err.user_message(), "Please enter the recipient's name");

        let mut input = draft(ContactMethod::Phone, "555-123-4567");
        input.message = String::new();
        assert!(matches!(input.validated(), Err(AppError::Validation(_))));

        let err = draft(ContactMethod::Email, " ").validated().unwrap_err();
        assert_eq!(err.user_message(), "Please enter an email");
    }

    #[test]
    fn test_validated_checks_contact_format_by_method() {
        assert!(draft(ContactMethod::Email, "not-an-email").validated().is_err());
        assert!(draft(ContactMethod::Phone, "12345").validated().is_err());
        // A phone number is not an email address
        assert!(draft(ContactMethod::Email, "555-123-4567").validated().is_err());
        assert!(draft(ContactMethod::Phone, "+1 (555) 123-4567").validated().is_ok());
    }

    #[test]
    fn test_contact_format_is_checked_as_typed() {
        let err = draft(ContactMethod::Email, " user@example.com ").validated().unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid email address");

        // Spaces are legal phone characters, so padding passes and is trimmed away
        let clean = draft(ContactMethod::Phone, " 555-123-4567 ").validated().unwrap();
        assert_eq!(clean.contact_value, "555-123-4567");
    }
}
