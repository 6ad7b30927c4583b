use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ContactMethod {
    Email,
    #[default]
    Phone,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
        }
    }

    /// The other method, used by the form's method switch
    pub fn toggled(self) -> Self {
        match self {
            ContactMethod::Email => ContactMethod::Phone,
            ContactMethod::Phone => ContactMethod::Email,
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored submission. `fulfilled` is the only field that changes after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub recipient_name: String,
    pub message: String,
    pub contact_method: ContactMethod,
    pub contact_value: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub fulfilled: bool,
}

/// Sender-supplied fields of a submission, before the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub recipient_name: String,
    pub message: String,
    pub contact_method: ContactMethod,
    pub contact_value: String,
}
