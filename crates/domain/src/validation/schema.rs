use crate::error::{DomainError, FieldViolation};
use crate::sign_up::{SignUpLead, ValidateSignUp, ValidationChannel};
use regex::Regex;
use std::fmt;

const CODE_REQUIRED: &str = "required";
const CODE_FORMAT: &str = "format";

/// Which request shape a set of violations belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    SignUpLead,
    ValidateSignUp,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::SignUpLead => write!(f, "sign up lead"),
            RequestKind::ValidateSignUp => write!(f, "validate sign up"),
        }
    }
}

/// Structural validator for the closed set of request shapes this service
/// accepts, with all patterns compiled once at startup.
#[derive(Debug)]
pub struct SchemaRegistry {
    email_shape: Regex,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        // Shape check only; deliverability is the validation worker's job.
        let email_shape = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|e| panic!("email pattern failed to compile: {e}"));
        Self { email_shape }
    }

    /// Validates an incoming lead. The required contact field depends on the
    /// chosen validation channel; the other one stays optional but must be
    /// well formed when present.
    pub fn validate_sign_up_lead(&self, lead: &SignUpLead) -> Result<(), DomainError> {
        let mut violations = Vec::new();

        match lead.validation_channel {
            Some(ValidationChannel::Email) => {
                if lead.email.is_none() {
                    violations.push(FieldViolation::new(
                        ".email",
                        CODE_REQUIRED,
                        "email is required when validating over EMAIL",
                    ));
                }
            }
            Some(ValidationChannel::Cellphone) => {
                if lead.cellphone.is_none() {
                    violations.push(FieldViolation::new(
                        ".cellphone",
                        CODE_REQUIRED,
                        "cellphone is required when validating over CELLPHONE",
                    ));
                }
            }
            None => {
                violations.push(FieldViolation::new(
                    ".validationChannel",
                    CODE_REQUIRED,
                    "validationChannel must be EMAIL or CELLPHONE",
                ));
            }
        }

        if let Some(email) = &lead.email {
            if !self.email_shape.is_match(email) {
                violations.push(FieldViolation::new(
                    ".email",
                    CODE_FORMAT,
                    "email is not a valid address",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::SchemaValidation {
                kind: RequestKind::SignUpLead,
                violations,
            })
        }
    }

    /// Validates a validation attempt: both the sign-up id and the code must
    /// be present and non-empty.
    pub fn validate_validate_sign_up(&self, request: &ValidateSignUp) -> Result<(), DomainError> {
        let mut violations = Vec::new();

        if request.sign_up_id.is_none() {
            violations.push(FieldViolation::new(
                ".signUpId",
                CODE_REQUIRED,
                "signUpId is required",
            ));
        }
        if request.validation_code.is_none() {
            violations.push(FieldViolation::new(
                ".validationCode",
                CODE_REQUIRED,
                "validationCode is required",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::SchemaValidation {
                kind: RequestKind::ValidateSignUp,
                violations,
            })
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    fn violations(err: DomainError) -> Vec<FieldViolation> {
        match err {
            DomainError::SchemaValidation { violations, .. } => violations,
            other => panic!("expected schema violations, got {other:?}"),
        }
    }

    #[test]
    fn cellphone_channel_requires_cellphone() {
        let lead = SignUpLead {
            validation_channel: Some(ValidationChannel::Cellphone),
            email: Some("lead@example.com".to_string()),
            ..Default::default()
        };
        let errs = violations(registry().validate_sign_up_lead(&lead).unwrap_err());
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, ".cellphone");
        assert_eq!(errs[0].code, "required");
    }

    #[test]
    fn email_channel_requires_email() {
        let lead = SignUpLead {
            validation_channel: Some(ValidationChannel::Email),
            cellphone: Some("5551234567".to_string()),
            ..Default::default()
        };
        let errs = violations(registry().validate_sign_up_lead(&lead).unwrap_err());
        assert_eq!(errs[0].field, ".email");
    }

    #[test]
    fn missing_channel_is_reported() {
        let errs = violations(
            registry()
                .validate_sign_up_lead(&SignUpLead::default())
                .unwrap_err(),
        );
        assert_eq!(errs[0].field, ".validationChannel");
    }

    #[test]
    fn malformed_email_fails_even_on_cellphone_channel() {
        let lead = SignUpLead {
            validation_channel: Some(ValidationChannel::Cellphone),
            cellphone: Some("5551234567".to_string()),
            email: Some("not-an-address".to_string()),
            ..Default::default()
        };
        let errs = violations(registry().validate_sign_up_lead(&lead).unwrap_err());
        assert_eq!(errs[0].field, ".email");
        assert_eq!(errs[0].code, "format");
    }

    #[test]
    fn well_formed_lead_passes() {
        let lead = SignUpLead {
            validation_channel: Some(ValidationChannel::Email),
            email: Some("lead@example.com".to_string()),
            ..Default::default()
        };
        assert!(registry().validate_sign_up_lead(&lead).is_ok());
    }

    #[test]
    fn validate_sign_up_needs_both_fields() {
        let errs = violations(
            registry()
                .validate_validate_sign_up(&ValidateSignUp::default())
                .unwrap_err(),
        );
        let fields: Vec<_> = errs.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec![".signUpId", ".validationCode"]);

        let full = ValidateSignUp {
            sign_up_id: Some("0190b9c5".to_string()),
            validation_code: Some("abc123".to_string()),
        };
        assert!(registry().validate_validate_sign_up(&full).is_ok());
    }
}
