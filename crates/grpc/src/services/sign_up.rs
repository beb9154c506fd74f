use crate::status::status_from;
use identity_application::{wire, SignUpLeadUseCase, ValidateSignUpUseCase};
use identity_domain::RequestContext;
use identity_proto as proto;
use identity_proto::SignUpService;
use tonic::{Request, Response, Status};
use tracing::debug;

/// The one gRPC service this process exposes.
pub struct SignUpServiceImpl {
    sign_up: SignUpLeadUseCase,
    validate: ValidateSignUpUseCase,
}

impl SignUpServiceImpl {
    pub fn new(sign_up: SignUpLeadUseCase, validate: ValidateSignUpUseCase) -> Self {
        Self { sign_up, validate }
    }
}

/// Context is injected by [`crate::interceptors::correlation`]; a request
/// that somehow bypassed it still gets a fresh one.
fn context_of<T>(request: &Request<T>) -> RequestContext {
    request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}

#[tonic::async_trait]
impl SignUpService for SignUpServiceImpl {
    async fn sign_up_lead(
        &self,
        request: Request<proto::SignUpLeadRequest>,
    ) -> Result<Response<proto::SignUpResponse>, Status> {
        let ctx = context_of(&request);
        debug!(correlation_id = %ctx.correlation_id(), "SignUpLead call");

        let lead = request
            .into_inner()
            .sign_up_lead
            .map(|lead| wire::lead_from_proto(&lead))
            .unwrap_or_default();

        let sign_up_id = self
            .sign_up
            .execute(&ctx, lead)
            .await
            .map_err(status_from)?;
        Ok(Response::new(proto::SignUpResponse { sign_up_id }))
    }

    async fn validate_sign_up(
        &self,
        request: Request<proto::ValidateSignUpRequest>,
    ) -> Result<Response<proto::ValidateSignUpResponse>, Status> {
        let ctx = context_of(&request);
        debug!(correlation_id = %ctx.correlation_id(), "ValidateSignUp call");

        let validate = wire::validate_from_proto(&request.into_inner());
        let outcome = self
            .validate
            .execute(&ctx, validate)
            .await
            .map_err(status_from)?;
        Ok(Response::new(proto::ValidateSignUpResponse {
            success: outcome.success,
            message: outcome.message.unwrap_or_default(),
        }))
    }
}
