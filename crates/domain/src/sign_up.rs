use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Channel over which a pending sign-up gets validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationChannel {
    Email,
    Cellphone,
}

impl ValidationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationChannel::Email => "EMAIL",
            ValidationChannel::Cellphone => "CELLPHONE",
        }
    }
}

impl fmt::Display for ValidationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValidationChannel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(ValidationChannel::Email),
            "CELLPHONE" => Ok(ValidationChannel::Cellphone),
            _ => Err(()),
        }
    }
}

/// An incoming sign-up lead as submitted by a caller.
///
/// Every field is optional at this stage. Which combination is required
/// depends on the chosen [`ValidationChannel`] and is enforced by
/// [`crate::validation::SchemaRegistry`], not by the type itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignUpLead {
    pub sign_up_id: Option<String>,
    pub cellphone: Option<String>,
    pub email: Option<String>,
    pub validation_channel: Option<ValidationChannel>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub signed_up_at: Option<DateTime<Utc>>,
}

impl SignUpLead {
    /// Turns empty and whitespace-only strings into `None` so that
    /// downstream presence checks and the persisted document only ever see
    /// meaningful values.
    pub fn strip_empty(&mut self) {
        strip_empty_string(&mut self.sign_up_id);
        strip_empty_string(&mut self.cellphone);
        strip_empty_string(&mut self.email);
    }

    /// Clears the operation dates.
    ///
    /// Callers cannot be trusted with lifecycle timestamps; the service is
    /// the only writer of `createdAt`, `updatedAt` and `signedUpAt`.
    pub fn strip_operation_dates(&mut self) {
        self.created_at = None;
        self.updated_at = None;
        self.signed_up_at = None;
    }

    /// Projects the lead into the partial document persisted in the store.
    /// The id travels separately as the document id.
    pub fn document(&self) -> SignUpDocument {
        SignUpDocument {
            cellphone: self.cellphone.clone(),
            email: self.email.clone(),
            validation_channel: self.validation_channel,
            created_at: self.created_at,
            updated_at: self.updated_at,
            signed_up_at: self.signed_up_at,
        }
    }
}

/// A validation attempt against a pending sign-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateSignUp {
    pub sign_up_id: Option<String>,
    pub validation_code: Option<String>,
}

impl ValidateSignUp {
    pub fn strip_empty(&mut self) {
        strip_empty_string(&mut self.sign_up_id);
        strip_empty_string(&mut self.validation_code);
    }
}

/// Partial sign-up document as persisted in the store, field names matching
/// the on-disk index mapping. Absent fields are omitted entirely so an
/// upsert merge never overwrites an existing value with null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellphone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_channel: Option<ValidationChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_up_at: Option<DateTime<Utc>>,
}

/// Lifecycle timestamps of a sign-up, as attached to jobs on the bus and
/// returned to workers interested in when a lead was first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_up_at: Option<DateTime<Utc>>,
}

/// A sign-up record as found in the store during dedup, reduced to the
/// fields retry and already-signed-up policy decisions look at.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSignUp {
    pub sign_up_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub signed_up_at: Option<DateTime<Utc>>,
}

impl StoredSignUp {
    pub fn operation_dates(&self) -> OperationDates {
        OperationDates {
            created_at: self.created_at,
            updated_at: self.updated_at,
            signed_up_at: self.signed_up_at,
        }
    }
}

fn strip_empty_string(value: &mut Option<String>) {
    if let Some(s) = value {
        if s.trim().is_empty() {
            *value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strip_empty_drops_blank_strings_only() {
        let mut lead = SignUpLead {
            sign_up_id: Some("  ".to_string()),
            cellphone: Some(String::new()),
            email: Some("lead@example.com".to_string()),
            ..Default::default()
        };
        lead.strip_empty();
        assert_eq!(lead.sign_up_id, None);
        assert_eq!(lead.cellphone, None);
        assert_eq!(lead.email.as_deref(), Some("lead@example.com"));
    }

    #[test]
    fn strip_operation_dates_clears_caller_supplied_timestamps() {
        let now = Utc::now();
        let mut lead = SignUpLead {
            created_at: Some(now),
            updated_at: Some(now),
            signed_up_at: Some(now),
            ..Default::default()
        };
        lead.strip_operation_dates();
        assert_eq!(lead.created_at, None);
        assert_eq!(lead.updated_at, None);
        assert_eq!(lead.signed_up_at, None);
    }

    #[test]
    fn document_serializes_camel_case_and_omits_absent_fields() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = SignUpDocument {
            cellphone: Some("+5551234567".to_string()),
            validation_channel: Some(ValidationChannel::Cellphone),
            created_at: Some(created),
            ..Default::default()
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["cellphone"], "+5551234567");
        assert_eq!(json["validationChannel"], "CELLPHONE");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
        assert!(json.get("email").is_none());
        assert!(json.get("signedUpAt").is_none());
    }

    #[test]
    fn validation_channel_round_trips_through_strings() {
        for channel in [ValidationChannel::Email, ValidationChannel::Cellphone] {
            assert_eq!(channel.as_str().parse::<ValidationChannel>(), Ok(channel));
        }
        assert!("SMS".parse::<ValidationChannel>().is_err());
    }
}
