//! Conversions between the binary wire shapes and the domain types.
//!
//! On the wire every field is present-but-zero when unset: empty strings and
//! the unspecified channel value both map to `None` here, and timestamps
//! travel as RFC 3339 strings. Conversions are lenient on the way in, since
//! whatever matters is validated or stripped afterwards anyway.

use chrono::{DateTime, Utc};
use identity_domain::{OperationDates, SignUpLead, ValidateSignUp, ValidationChannel};
use identity_proto as proto;

pub fn lead_from_proto(lead: &proto::SignUpLead) -> SignUpLead {
    SignUpLead {
        sign_up_id: non_empty(&lead.sign_up_id),
        cellphone: non_empty(&lead.cellphone),
        email: non_empty(&lead.email),
        validation_channel: channel_from_proto(lead.validation_channel),
        created_at: parse_datetime(&lead.created_at),
        updated_at: parse_datetime(&lead.updated_at),
        signed_up_at: parse_datetime(&lead.signed_up_at),
    }
}

pub fn lead_to_proto(lead: &SignUpLead) -> proto::SignUpLead {
    proto::SignUpLead {
        sign_up_id: lead.sign_up_id.clone().unwrap_or_default(),
        cellphone: lead.cellphone.clone().unwrap_or_default(),
        email: lead.email.clone().unwrap_or_default(),
        validation_channel: channel_to_proto(lead.validation_channel),
        created_at: format_datetime(lead.created_at),
        updated_at: format_datetime(lead.updated_at),
        signed_up_at: format_datetime(lead.signed_up_at),
    }
}

pub fn validate_from_proto(request: &proto::ValidateSignUpRequest) -> ValidateSignUp {
    ValidateSignUp {
        sign_up_id: non_empty(&request.sign_up_id),
        validation_code: non_empty(&request.validation_code),
    }
}

pub fn validate_to_proto(request: &ValidateSignUp) -> proto::ValidateSignUpRequest {
    proto::ValidateSignUpRequest {
        sign_up_id: request.sign_up_id.clone().unwrap_or_default(),
        validation_code: request.validation_code.clone().unwrap_or_default(),
    }
}

pub fn dates_from_proto(dates: &proto::OperationsDates) -> OperationDates {
    OperationDates {
        created_at: parse_datetime(&dates.created_at),
        updated_at: parse_datetime(&dates.updated_at),
        signed_up_at: parse_datetime(&dates.signed_up_at),
    }
}

pub fn channel_from_proto(value: i32) -> Option<ValidationChannel> {
    match proto::ValidationChannel::try_from(value) {
        Ok(proto::ValidationChannel::Email) => Some(ValidationChannel::Email),
        Ok(proto::ValidationChannel::Cellphone) => Some(ValidationChannel::Cellphone),
        _ => None,
    }
}

pub fn channel_to_proto(channel: Option<ValidationChannel>) -> i32 {
    match channel {
        Some(ValidationChannel::Email) => proto::ValidationChannel::Email as i32,
        Some(ValidationChannel::Cellphone) => proto::ValidationChannel::Cellphone as i32,
        None => proto::ValidationChannel::Unspecified as i32,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map(|dt| dt.to_rfc3339()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn lead_round_trips_through_the_wire_shape() {
        let lead = SignUpLead {
            sign_up_id: Some("0190b9c5".to_string()),
            cellphone: Some("+5551234567".to_string()),
            email: None,
            validation_channel: Some(ValidationChannel::Cellphone),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            updated_at: None,
            signed_up_at: None,
        };
        assert_eq!(lead_from_proto(&lead_to_proto(&lead)), lead);
    }

    #[test]
    fn empty_wire_fields_become_absent() {
        let lead = lead_from_proto(&proto::SignUpLead::default());
        assert_eq!(lead, SignUpLead::default());
    }

    #[test]
    fn unknown_channel_values_map_to_none() {
        assert_eq!(channel_from_proto(0), None);
        assert_eq!(channel_from_proto(99), None);
        assert_eq!(channel_from_proto(2), Some(ValidationChannel::Cellphone));
    }

    #[test]
    fn garbage_timestamps_are_dropped_not_fatal() {
        let wire = proto::SignUpLead {
            created_at: "yesterday-ish".to_string(),
            ..Default::default()
        };
        assert_eq!(lead_from_proto(&wire).created_at, None);
    }
}
