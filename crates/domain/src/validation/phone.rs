use crate::error::DomainError;

// E.164 caps numbers at 15 digits; anything under 8 cannot reach a mobile
// subscriber anywhere.
const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// Normalizes a raw cellphone value to E.164-ish form: every non-digit is
/// dropped and a single `+` is prefixed. `"(555) 123-4567"` becomes
/// `"+5551234567"`.
pub fn normalize_cellphone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("+{digits}")
}

/// Checks that a normalized cellphone is a plausible mobile number.
///
/// The number must parse as an international number and carry an E.164-legal
/// amount of digits. Numbers the metadata recognizes as valid pass outright;
/// for the rest, length bounds decide, since carriers open new ranges faster
/// than metadata ships and a fresh lead should not bounce on a stale table.
pub fn validate_mobile_phone(field: &str, candidate: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidPhoneNumber {
        field: field.to_string(),
    };

    let parsed = phonenumber::parse(None, candidate).map_err(|_| invalid())?;
    if phonenumber::is_valid(&parsed) {
        return Ok(());
    }

    let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_punctuation_and_prefixes_plus() {
        assert_eq!(normalize_cellphone("(555) 123-4567"), "+5551234567");
        assert_eq!(normalize_cellphone("+55 51 99123-4567"), "+5551991234567");
        assert_eq!(normalize_cellphone("5551234567"), "+5551234567");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_cellphone("(555) 123-4567");
        assert_eq!(normalize_cellphone(&once), once);
    }

    #[test]
    fn plausible_numbers_pass() {
        assert!(validate_mobile_phone(".cellphone", "+5551234567").is_ok());
        assert!(validate_mobile_phone(".cellphone", "+14155552671").is_ok());
    }

    #[test]
    fn too_short_numbers_fail() {
        let err = validate_mobile_phone(".cellphone", "+123").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidPhoneNumber {
                field: ".cellphone".to_string()
            }
        );
    }

    #[test]
    fn non_numeric_input_fails() {
        assert!(validate_mobile_phone(".cellphone", "+").is_err());
        assert!(validate_mobile_phone(".cellphone", "call me").is_err());
    }
}
