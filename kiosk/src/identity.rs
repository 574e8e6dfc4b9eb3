//! Caller identity for core operations.
//!
//! Every transition takes an explicit [`Caller`] rather than reading an
//! ambient session. Authentication happens in the excluded presentation
//! layer; by the time an operation is invoked the identity and role are
//! already resolved.

use serde::{Deserialize, Serialize};

use crate::listing::ValidationError;

/// The role a caller acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// An ordinary shopper: may book, cancel their own hold, submit payment.
    Shopper,
    /// An administrator: may create listings and resolve verifications.
    Admin,
}

/// An authenticated caller.
///
/// Emails are normalized to lowercase and trimmed, matching how the store
/// compares buyer identity.
///
/// # Examples
///
/// ```
/// use kiosk::{Caller, Role};
///
/// let shopper = Caller::shopper("Ayesha@Example.com", "923001234567").unwrap();
/// assert_eq!(shopper.email(), "ayesha@example.com");
/// assert_eq!(shopper.role(), Role::Shopper);
/// assert!(!shopper.is_admin());
///
/// let admin = Caller::admin("admin").unwrap();
/// assert!(admin.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    email: String,
    phone: Option<String>,
    role: Role,
}

impl Caller {
    /// Creates a shopper identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or phone is empty after trimming.
    pub fn shopper(
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = normalize_email(email.into())?;
        let phone = phone.into().trim().to_string();
        if phone.is_empty() {
            return Err(ValidationError {
                field: "phone".into(),
                message: "phone must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self {
            email,
            phone: Some(phone),
            role: Role::Shopper,
        })
    }

    /// Creates an admin identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty after trimming.
    pub fn admin(email: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            email: normalize_email(email.into())?,
            phone: None,
            role: Role::Admin,
        })
    }

    /// Returns the caller's normalized email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the caller's phone number, if one was supplied.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn normalize_email(email: String) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError {
            field: "email".into(),
            message: "email must be non-empty after trimming whitespace".into(),
        });
    }
    Ok(email)
}
