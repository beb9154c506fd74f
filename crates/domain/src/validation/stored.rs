use crate::error::DomainError;
use crate::sign_up::StoredSignUp;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Applies the retry policy to a dedup hit.
///
/// A record that already carries `signedUpAt` can never sign up again. An
/// unfinished record may retry only once `cooldown` has elapsed since its
/// last operation; exactly at the boundary the retry is allowed.
pub fn validate_stored_sign_up(
    stored: &StoredSignUp,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Result<(), DomainError> {
    if stored.signed_up_at.is_some() {
        return Err(DomainError::AlreadySignedUp);
    }

    let last_operation = match stored.updated_at.or(stored.created_at) {
        Some(at) => at,
        // A hit with no timestamps at all has nothing to throttle on.
        None => return Ok(()),
    };

    let elapsed = now
        .signed_duration_since(last_operation)
        .to_std()
        .unwrap_or(Duration::ZERO);
    if elapsed < cooldown {
        return Err(DomainError::WaitBeforeRetry {
            remaining: cooldown - elapsed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const COOLDOWN: Duration = Duration::from_secs(180);

    fn stored(
        updated_secs_ago: Option<i64>,
        signed_up: bool,
        now: DateTime<Utc>,
    ) -> StoredSignUp {
        StoredSignUp {
            sign_up_id: "0190b9c5".to_string(),
            created_at: Some(now - chrono::Duration::seconds(3600)),
            updated_at: updated_secs_ago.map(|s| now - chrono::Duration::seconds(s)),
            signed_up_at: signed_up.then_some(now - chrono::Duration::seconds(60)),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn signed_up_record_always_refuses() {
        let err = validate_stored_sign_up(&stored(Some(10_000), true, now()), now(), COOLDOWN);
        assert_eq!(err, Err(DomainError::AlreadySignedUp));
    }

    #[test]
    fn recent_attempt_must_wait() {
        let err = validate_stored_sign_up(&stored(Some(60), false, now()), now(), COOLDOWN);
        match err {
            Err(DomainError::WaitBeforeRetry { remaining }) => {
                assert_eq!(remaining, Duration::from_secs(120));
            }
            other => panic!("expected WaitBeforeRetry, got {other:?}"),
        }
    }

    #[test]
    fn cooldown_boundary_allows_retry() {
        assert!(validate_stored_sign_up(&stored(Some(180), false, now()), now(), COOLDOWN).is_ok());
        assert!(validate_stored_sign_up(&stored(Some(181), false, now()), now(), COOLDOWN).is_ok());
    }

    #[test]
    fn falls_back_to_created_at_when_never_updated() {
        // createdAt is an hour old, well past the cooldown.
        assert!(validate_stored_sign_up(&stored(None, false, now()), now(), COOLDOWN).is_ok());
    }

    #[test]
    fn future_timestamp_clamps_to_waiting() {
        let err = validate_stored_sign_up(&stored(Some(-30), false, now()), now(), COOLDOWN);
        match err {
            Err(DomainError::WaitBeforeRetry { remaining }) => {
                assert_eq!(remaining, COOLDOWN);
            }
            other => panic!("expected WaitBeforeRetry, got {other:?}"),
        }
    }
}
