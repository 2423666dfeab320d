//! Account rules: identifier validation, the reserved bootstrap account,
//! and profile-update planning.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Username of the bootstrap administrator created on first start.
///
/// This account cannot be deleted, renamed, or demoted through the API.
pub const RESERVED_ADMIN_USERNAME: &str = "admin";

/// Maximum accepted username length (characters).
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Minimum password length enforced on user creation and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Returns `true` for the reserved bootstrap account.
pub fn is_reserved_account(username: &str) -> bool {
    username == RESERVED_ADMIN_USERNAME
}

/// Validate a username: non-empty, no whitespace, at most
/// [`MAX_USERNAME_LENGTH`] characters.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username is required".into()));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Username must not contain whitespace".into(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate that `email` looks like an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate that a password meets the minimum length.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Refuse deletion of the reserved account.
pub fn ensure_deletable(username: &str) -> Result<(), CoreError> {
    if is_reserved_account(username) {
        return Err(CoreError::Forbidden(format!(
            "The '{RESERVED_ADMIN_USERNAME}' account cannot be deleted"
        )));
    }
    Ok(())
}

/// Refuse renaming or demoting the reserved account.
///
/// Email and password changes on the reserved account are allowed.
pub fn ensure_editable(
    current_username: &str,
    new_username: Option<&str>,
    new_is_admin: Option<bool>,
) -> Result<(), CoreError> {
    if !is_reserved_account(current_username) {
        return Ok(());
    }
    if new_username.is_some_and(|name| name != current_username) {
        return Err(CoreError::Forbidden(format!(
            "The '{RESERVED_ADMIN_USERNAME}' account cannot be renamed"
        )));
    }
    if new_is_admin == Some(false) {
        return Err(CoreError::Forbidden(format!(
            "The '{RESERVED_ADMIN_USERNAME}' account cannot lose admin rights"
        )));
    }
    Ok(())
}

/// Fields a self-service profile update will actually change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    /// New email address, when it differs from the stored one.
    pub email: Option<String>,
    /// New plaintext password, still to be hashed.
    pub new_password: Option<String>,
}

/// Work out which profile fields change.
///
/// Empty strings are treated as "not supplied". An email equal to the
/// stored one is not a change. Fails with a validation error when nothing
/// would change or a supplied value is malformed.
pub fn plan_profile_update(
    stored_email: Option<&str>,
    requested_email: Option<&str>,
    new_password: Option<&str>,
) -> Result<ProfileChanges, CoreError> {
    let email = match requested_email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(e) if Some(e) != stored_email => {
            validate_email(e)?;
            Some(e.to_string())
        }
        _ => None,
    };

    let new_password = match new_password.filter(|p| !p.is_empty()) {
        Some(p) => {
            validate_password_strength(p)?;
            Some(p.to_string())
        }
        None => None,
    };

    if email.is_none() && new_password.is_none() {
        return Err(CoreError::Validation("No changes to update".into()));
    }

    Ok(ProfileChanges {
        email,
        new_password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_validation<T>(result: Result<T, CoreError>) -> bool {
        matches!(result, Err(CoreError::Validation(_)))
    }

    #[test]
    fn reserved_account_is_recognised() {
        assert!(is_reserved_account("admin"));
        assert!(!is_reserved_account("Admin"));
        assert!(!is_reserved_account("alice"));
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(is_validation(validate_username("")));
        assert!(is_validation(validate_username("two words")));
        assert!(is_validation(validate_username(&"x".repeat(MAX_USERNAME_LENGTH + 1))));
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(is_validation(validate_email("")));
        assert!(is_validation(validate_email("not-an-email")));
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password_strength("12345678").is_ok());
        assert!(is_validation(validate_password_strength("1234567")));
    }

    #[test]
    fn reserved_account_cannot_be_deleted() {
        assert!(matches!(
            ensure_deletable("admin"),
            Err(CoreError::Forbidden(_))
        ));
        assert!(ensure_deletable("alice").is_ok());
    }

    #[test]
    fn reserved_account_cannot_be_renamed_or_demoted() {
        assert!(matches!(
            ensure_editable("admin", Some("root"), None),
            Err(CoreError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_editable("admin", None, Some(false)),
            Err(CoreError::Forbidden(_))
        ));
        assert!(ensure_editable("admin", Some("admin"), Some(true)).is_ok());
        assert!(ensure_editable("alice", Some("bob"), Some(false)).is_ok());
    }

    #[test]
    fn profile_update_with_new_email() {
        let plan = plan_profile_update(Some("old@example.com"), Some("new@example.com"), None)
            .expect("plan should succeed");
        assert_eq!(plan.email.as_deref(), Some("new@example.com"));
        assert!(plan.new_password.is_none());
    }

    #[test]
    fn profile_update_same_email_is_no_change() {
        let result = plan_profile_update(Some("a@example.com"), Some("a@example.com"), None);
        assert!(is_validation(result));
    }

    #[test]
    fn profile_update_empty_values_are_ignored() {
        assert!(is_validation(plan_profile_update(None, Some(""), Some(""))));

        let plan = plan_profile_update(None, Some(""), Some("long-enough-pw"))
            .expect("plan should succeed");
        assert!(plan.email.is_none());
        assert_eq!(plan.new_password.as_deref(), Some("long-enough-pw"));
    }

    #[test]
    fn profile_update_rejects_bad_email() {
        assert!(is_validation(plan_profile_update(None, Some("nope"), None)));
    }
}
