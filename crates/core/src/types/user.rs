//! Client-side user profile.

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};

/// The profile kept in local storage.
///
/// Every field is free text and may be blank; only placing an order needs a
/// usable email (see [`UserProfile::order_email`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl UserProfile {
    /// Email given to anonymous profiles.
    pub const PLACEHOLDER_EMAIL: &'static str = "user@example.com";

    /// First name given to anonymous profiles.
    pub const ANONYMOUS_FIRST_NAME: &'static str = "Anonymous";

    /// Exclusive upper bound of the anonymous surname suffix.
    pub const SUFFIX_BOUND: u16 = 10_000;

    /// Placeholder identity used the first time the client starts.
    #[must_use]
    pub fn anonymous(suffix: u16) -> Self {
        Self {
            email: Self::PLACEHOLDER_EMAIL.to_string(),
            first_name: Self::ANONYMOUS_FIRST_NAME.to_string(),
            last_name: format!("User{suffix}"),
            phone: String::new(),
        }
    }

    /// `"first last"` with blank parts dropped.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// The email to attach to an order.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Blank`] for a blank email, or the relevant
    /// [`EmailError`] if it is malformed.
    pub fn order_email(&self) -> Result<Email, EmailError> {
        Email::parse(&self.email)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_profile() {
        let profile = UserProfile::anonymous(42);
        assert_eq!(profile.email, "user@example.com");
        assert_eq!(profile.first_name, "Anonymous");
        assert_eq!(profile.last_name, "User42");
        assert!(profile.phone.is_empty());
    }

    #[test]
    fn test_camel_case_record() {
        let profile = UserProfile::anonymous(7);
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            serde_json::json!({
                "email": "user@example.com",
                "firstName": "Anonymous",
                "lastName": "User7",
                "phone": ""
            })
        );
    }

    #[test]
    fn test_missing_fields_default_to_blank() {
        let profile: UserProfile = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(profile.email, "a@b.c");
        assert!(profile.first_name.is_empty());
    }

    #[test]
    fn test_display_name() {
        let mut profile = UserProfile::anonymous(1);
        assert_eq!(profile.display_name(), "Anonymous User1");
        profile.first_name = String::new();
        assert_eq!(profile.display_name(), "User1");
    }

    #[test]
    fn test_order_email() {
        let mut profile = UserProfile::anonymous(1);
        assert!(profile.order_email().is_ok());
        profile.email = "  ".to_string();
        assert_eq!(profile.order_email(), Err(EmailError::Blank));
    }
}
