//! Field-level validation for create and update payloads.
//!
//! Every field is checked on every call and all violations are reported
//! together. Each field contributes at most one message: a missing value is
//! reported as missing and its syntax rule is skipped.
//!
//! | Field | Rules |
//! |-------|-------|
//! | `name` | present, at most [`NAME_MAX_CHARS`] characters |
//! | `email` | present, `local@domain` with exactly one `@` |
//! | `phone` | present, optional `+`, digits and `- . ( )` separators, optional extension |
//!
//! Uniqueness of `email` needs the store, so it lives in
//! [`CustomerService`](crate::CustomerService), not here.

use crate::model::{CustomerFields, CustomerPayload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum length of `name`, counted in Unicode scalar values.
pub const NAME_MAX_CHARS: usize = 100;

const NAME_REQUIRED: &str = "El nombre es obligatorio";
const NAME_TOO_LONG: &str = "El nombre no puede exceder 100 caracteres";
const EMAIL_REQUIRED: &str = "El correo electronico es obligatorio";
const EMAIL_INVALID: &str = "El correo electronico no es valido";
const PHONE_REQUIRED: &str = "El telefono es obligatorio";
const PHONE_INVALID: &str = "El telefono no es valido";

const PHONE_SEPARATORS: &[char] = &['-', '.', '(', ')'];
const PHONE_EXTENSION_MARKERS: &[&str] = &["ext.", "ext", "x"];

/// Field name to the messages of every rule that failed for it.
///
/// Serializes as a plain JSON object, e.g.
/// `{"email": ["El correo electronico no es valido"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields that failed, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Check a payload against every field rule.
///
/// Returns the validated fields untouched (no trimming or case folding) or
/// the full set of violations.
pub fn validate(payload: &CustomerPayload) -> Result<CustomerFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match present(&payload.name) {
        None => {
            errors.add("name", NAME_REQUIRED);
            None
        }
        Some(name) if name.chars().count() > NAME_MAX_CHARS => {
            errors.add("name", NAME_TOO_LONG);
            None
        }
        Some(name) => Some(name),
    };

    let email = match present(&payload.email) {
        None => {
            errors.add("email", EMAIL_REQUIRED);
            None
        }
        Some(email) if !is_valid_email(email) => {
            errors.add("email", EMAIL_INVALID);
            None
        }
        Some(email) => Some(email),
    };

    let phone = match present(&payload.phone) {
        None => {
            errors.add("phone", PHONE_REQUIRED);
            None
        }
        Some(phone) if !is_valid_phone(phone) => {
            errors.add("phone", PHONE_INVALID);
            None
        }
        Some(phone) => Some(phone),
    };

    match (name, email, phone) {
        (Some(name), Some(email), Some(phone)) if errors.is_empty() => Ok(CustomerFields {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }),
        _ => Err(errors),
    }
}

/// A value counts as present when it is set and not blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// `local@domain`: exactly one `@`, neither side empty, no whitespace or
/// control characters. The domain needs no dot.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Loose, locale-unaware phone syntax.
///
/// Accepts an optional leading `+`, then digits, whitespace and `- . ( )`,
/// with at least one digit, optionally followed by an extension such as
/// `x12`, `ext 12` or `ext. 12`.
pub fn is_valid_phone(value: &str) -> bool {
    let number = strip_extension(value.trim());
    let number = number.strip_prefix('+').unwrap_or(number);

    number.chars().any(|c| c.is_ascii_digit())
        && number
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || PHONE_SEPARATORS.contains(&c))
}

fn strip_extension(value: &str) -> &str {
    // ASCII lowercasing keeps byte offsets aligned with `value`.
    let lower = value.to_ascii_lowercase();
    for marker in PHONE_EXTENSION_MARKERS {
        if let Some(pos) = lower.rfind(marker) {
            let digits = value[pos + marker.len()..].trim_start();
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return &value[..pos];
            }
        }
    }
    value
}
