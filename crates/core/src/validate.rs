//! Pre-submit checks shared across resource kinds and the auth forms.
//!
//! Every function here is pure. Callers run them before building a request;
//! a failure means no request is sent and no cached state changes.

use core::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Minimum password length accepted by the sign-in and registration forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum company-name length accepted by the registration form.
pub const MIN_COMPANY_NAME_LEN: usize = 2;

/// Trimmed, non-empty record name.
pub fn required_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(name.to_string())
}

/// Empty (after trimming) optional text becomes `None`.
pub fn optional_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Quantity and price as typed into the item form.
///
/// Both must parse; either failing yields the same message.
pub fn quantity_and_price(quantity: &str, price: &str) -> Result<(i64, Decimal), ValidationError> {
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber)?;
    let price = Decimal::from_str(price.trim()).map_err(|_| ValidationError::InvalidNumber)?;
    Ok((quantity, price))
}

/// Sign-in form: an address with text on both sides of `@`, and a long enough password.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
        _ => return Err(ValidationError::InvalidEmail),
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Registration form: company name plus the sign-in rules.
pub fn validate_registration(
    company_name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if company_name.trim().chars().count() < MIN_COMPANY_NAME_LEN {
        return Err(ValidationError::CompanyNameRequired);
    }
    validate_login(email, password)
}
