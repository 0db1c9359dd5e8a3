use serde::{Deserialize, Serialize};

/// A persisted customer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Store-assigned primary key. Never changes after creation.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Body of a create or update request, exactly as the caller sent it.
///
/// Absent keys and JSON `null` both land as `None`; the validation layer
/// decides what that means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerPayload {
    /// Payload with all three fields set.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
        }
    }
}

/// The three writable columns of a customer, after validation.
///
/// Only [`crate::validate`] builds this type, so a store never sees a
/// partial or malformed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerFields {
    pub(crate) fn into_customer(self, id: i64) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}
