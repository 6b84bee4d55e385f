//! Common validation utilities.
//!
//! Custom validators referenced from `#[validate(custom(...))]` derives in
//! the domain request types.

use std::net::IpAddr;

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Equipment/branch codes: alphanumeric with `-`/`_`, 2..=30 chars,
    /// must start alphanumeric (e.g. "BR-001", "ATM-014").
    static ref CODE_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{1,29}$").unwrap();

    /// Permissive phone shape: optional leading `+`, then digits and
    /// common separators.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 ().-]{4,23}$").unwrap();

    /// RFC 1123 hostname label sequence.
    static ref HOSTNAME_RE: Regex =
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]{0,251}[A-Za-z0-9])?$").unwrap();
}

/// Validates a percentage value (0 to 100 inclusive).
pub fn validate_percentage(value: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("percentage_range");
        err.message = Some("Value must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates a monetary amount is non-negative.
pub fn validate_non_negative_amount(value: i64) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_negative");
        err.message = Some("Amount must not be negative".into());
        Err(err)
    }
}

/// Validates an equipment or branch code (e.g. "ATM-001").
pub fn validate_entity_code(code: &str) -> Result<(), ValidationError> {
    if CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("code_format");
        err.message =
            Some("Code must be 2-30 alphanumeric characters, dashes or underscores".into());
        Err(err)
    }
}

/// Validates a contact phone number shape.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Invalid phone number format".into());
        Err(err)
    }
}

/// Validates an IPv4/IPv6 address string.
pub fn validate_ip_address(ip: &str) -> Result<(), ValidationError> {
    if ip.parse::<IpAddr>().is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("ip_format");
        err.message = Some("Invalid IP address".into());
        Err(err)
    }
}

/// Validates a hostname shape.
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
    if HOSTNAME_RE.is_match(hostname) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hostname_format");
        err.message = Some("Invalid hostname".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::IPv4;
    use fake::Fake;

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(0.0).is_ok());
        assert!(validate_percentage(50.5).is_ok());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(-0.1).is_err());
        assert!(validate_percentage(100.1).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(0).is_ok());
        assert!(validate_non_negative_amount(1_000_000).is_ok());
        assert!(validate_non_negative_amount(-1).is_err());
    }

    #[test]
    fn test_validate_entity_code() {
        assert!(validate_entity_code("ATM-001").is_ok());
        assert!(validate_entity_code("BR_12").is_ok());
        assert!(validate_entity_code("pos-terminal-9").is_ok());
        assert!(validate_entity_code("A").is_err()); // too short
        assert!(validate_entity_code("-ATM").is_err()); // bad first char
        assert!(validate_entity_code("ATM 001").is_err()); // space
        assert!(validate_entity_code("").is_err());
    }

    #[test]
    fn test_validate_entity_code_max_length() {
        let ok = "A".repeat(30);
        let too_long = "A".repeat(31);
        assert!(validate_entity_code(&ok).is_ok());
        assert!(validate_entity_code(&too_long).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+254 700 123456").is_ok());
        assert!(validate_phone("0712-345-678").is_ok());
        assert!(validate_phone("(01) 234 5678").is_err()); // must start with digit after +
        assert!(validate_phone("+1 (555) 010-9999").is_ok());
        assert!(validate_phone("call-me").is_err());
        assert!(validate_phone("123").is_err()); // too short
    }

    #[test]
    fn test_validate_ip_address() {
        assert!(validate_ip_address("10.1.20.14").is_ok());
        assert!(validate_ip_address("::1").is_ok());
        assert!(validate_ip_address("300.1.1.1").is_err());
        assert!(validate_ip_address("not-an-ip").is_err());
        assert!(validate_ip_address("").is_err());
    }

    #[test]
    fn test_validate_ip_address_generated() {
        for _ in 0..20 {
            let ip: String = IPv4().fake();
            assert!(validate_ip_address(&ip).is_ok(), "generated ip {}", ip);
        }
    }

    #[test]
    fn test_validate_hostname() {
        assert!(validate_hostname("core-sw-01").is_ok());
        assert!(validate_hostname("db1.branch.bank.local").is_ok());
        assert!(validate_hostname("a").is_ok());
        assert!(validate_hostname("-bad").is_err());
        assert!(validate_hostname("bad-").is_err());
        assert!(validate_hostname("").is_err());
    }
}
