use identity_domain::RequestContext;
use identity_shared::CorrelationId;
use tonic::{Request, Status};

/// Builds the [`RequestContext`] for every call and stashes it in the
/// request extensions. The caller may supply its own correlation id in the
/// `callid` metadata; anything unusable falls back to a generated one.
pub fn correlation(mut request: Request<()>) -> Result<Request<()>, Status> {
    let correlation_id = request
        .metadata()
        .get("callid")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(CorrelationId::from_caller)
        .unwrap_or_else(CorrelationId::generate);

    request
        .extensions_mut()
        .insert(RequestContext::with_correlation_id(correlation_id));
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_supplied_callid_is_kept() {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert("callid", "caller-abc".parse().unwrap());

        let request = correlation(request).unwrap();
        let ctx = request.extensions().get::<RequestContext>().unwrap();
        assert_eq!(ctx.correlation_id().as_str(), "caller-abc");
    }

    #[test]
    fn missing_or_blank_callid_gets_a_generated_one() {
        let request = correlation(Request::new(())).unwrap();
        let generated = request.extensions().get::<RequestContext>().unwrap();
        assert!(!generated.correlation_id().as_str().is_empty());

        let mut blank = Request::new(());
        blank.metadata_mut().insert("callid", "  ".parse().unwrap());
        let blank = correlation(blank).unwrap();
        let ctx = blank.extensions().get::<RequestContext>().unwrap();
        assert_ne!(ctx.correlation_id().as_str(), "  ");
    }
}
