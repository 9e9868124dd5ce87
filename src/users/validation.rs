use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref PASSWORD_CHARSET_RE: Regex = Regex::new(r"^[a-zA-Z0-9]{8,}$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 ASCII letters or digits, with one lowercase, one uppercase and one digit.
pub(crate) fn is_valid_password(password: &str) -> bool {
    PASSWORD_CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_common_forms() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
    }

    #[test]
    fn email_rejects_malformed() {
        for bad in ["", "plain", "a@b", "a@b.c", "@b.com", "a b@c.com", "a@b.com "] {
            assert!(!is_valid_email(bad), "{bad:?}");
        }
    }

    #[test]
    fn password_requires_all_classes_and_length() {
        assert!(is_valid_password("Abcdef12"));
        assert!(is_valid_password("ZZZZzzzz9999"));

        assert!(!is_valid_password("Abcde12"), "too short");
        assert!(!is_valid_password("abcdef12"), "no uppercase");
        assert!(!is_valid_password("ABCDEF12"), "no lowercase");
        assert!(!is_valid_password("Abcdefgh"), "no digit");
        assert!(!is_valid_password("Abcdef12!"), "symbol");
    }
}
