use crate::error::ApiError;
use crate::protocol::{
    FIELD_OPERATION_DATES, FIELD_REQUEST, FIELD_VALIDATE_RESPONSE, GROUP_IDENTITY_SERVICE,
    STREAM_VALIDATE_SIGN_UP,
};
use crate::wire;
use identity_domain::jobs::JobProducer;
use identity_domain::ports::{DispatchOptions, FetchSpec, RoutingPolicy, SignUpStore};
use identity_domain::validation::SchemaRegistry;
use identity_domain::{DomainError, RequestContext, SignUpDocument, ValidateSignUp};
use identity_proto as proto;
use prost::Message;
use std::sync::Arc;
use tracing::{debug, info};

/// The worker's verdict on a validation attempt, returned to the caller
/// as-is whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub success: bool,
    pub message: Option<String>,
}

/// Validates a pending sign-up.
///
/// The sign-up must already exist in the store. The validation decision is
/// made entirely by the worker tier; on success the operation timestamps the
/// worker reports are merged into the stored document, completing the
/// sign-up.
pub struct ValidateSignUpUseCase {
    store: Arc<dyn SignUpStore>,
    producer: JobProducer,
    schemas: Arc<SchemaRegistry>,
}

impl ValidateSignUpUseCase {
    pub fn new(
        store: Arc<dyn SignUpStore>,
        producer: JobProducer,
        schemas: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            store,
            producer,
            schemas,
        }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        mut request: ValidateSignUp,
    ) -> Result<ValidationOutcome, ApiError> {
        debug!(correlation_id = %ctx.correlation_id(), "validate sign-up received");

        request.strip_empty();
        self.schemas.validate_validate_sign_up(&request)?;
        let sign_up_id = request.sign_up_id.clone().ok_or_else(|| {
            ApiError::Payload("signUpId absent after schema validation".to_string())
        })?;

        if !self.store.exists(&sign_up_id).await? {
            return Err(DomainError::SignUpNotFound {
                sign_up_id: sign_up_id.clone(),
            }
            .into());
        }

        let mut job = self.producer.job();
        info!(
            correlation_id = %ctx.correlation_id(),
            job_id = %job.id(),
            sign_up_id = %sign_up_id,
            stream = STREAM_VALIDATE_SIGN_UP,
            "dispatching sign-up validation"
        );
        job.set_field(
            FIELD_REQUEST,
            wire::validate_to_proto(&request).encode_to_vec(),
        );
        self.producer.push(&mut job).await?;
        self.producer
            .dispatch(
                &mut job,
                DispatchOptions {
                    stream: STREAM_VALIDATE_SIGN_UP.to_string(),
                    route: RoutingPolicy::Distributed,
                    wait_for: vec![GROUP_IDENTITY_SERVICE.to_string()],
                    reject_on_error: true,
                },
            )
            .await?;
        self.producer.finished(&mut job).await?;

        let mut fields = self
            .producer
            .fetch(
                &mut job,
                &[
                    FetchSpec::take(FIELD_VALIDATE_RESPONSE),
                    FetchSpec::take(FIELD_OPERATION_DATES),
                ],
            )
            .await?;

        let response = fields.remove(FIELD_VALIDATE_RESPONSE).ok_or_else(|| {
            ApiError::Payload(format!("worker returned no {FIELD_VALIDATE_RESPONSE} field"))
        })?;
        let response = proto::ValidateSignUpResponse::decode(response.as_slice())
            .map_err(|e| ApiError::Payload(format!("undecodable validation response: {e}")))?;

        if response.success {
            let dates = fields.remove(FIELD_OPERATION_DATES).ok_or_else(|| {
                ApiError::Payload(format!(
                    "successful validation without a {FIELD_OPERATION_DATES} field"
                ))
            })?;
            let dates = proto::OperationsDates::decode(dates.as_slice())
                .map_err(|e| ApiError::Payload(format!("undecodable operation dates: {e}")))?;
            let dates = wire::dates_from_proto(&dates);

            let document = SignUpDocument {
                created_at: dates.created_at,
                updated_at: dates.updated_at,
                signed_up_at: dates.signed_up_at,
                ..Default::default()
            };
            self.store.upsert(&sign_up_id, &document).await?;
            info!(
                correlation_id = %ctx.correlation_id(),
                sign_up_id = %sign_up_id,
                "sign-up validated and indexed"
            );
        } else {
            info!(
                correlation_id = %ctx.correlation_id(),
                sign_up_id = %sign_up_id,
                "sign-up validation refused by worker"
            );
        }

        Ok(ValidationOutcome {
            success: response.success,
            message: if response.message.is_empty() {
                None
            } else {
                Some(response.message)
            },
        })
    }
}
