//! Authentication and role tests

use std::str::FromStr;

use shared::models::UserRole;
use shared::validation::{validate_email, validate_password};

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("admin"), Ok(UserRole::Admin));
        assert_eq!(UserRole::from_str("employee"), Ok(UserRole::Employee));
        assert!(UserRole::from_str("root").is_err());
        assert!(UserRole::from_str("").is_err());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Employee] {
            assert_eq!(UserRole::from_str(role.as_str()), Ok(role));
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("owner@shop.co.th").is_ok());
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("2short").is_err());
    }
}
