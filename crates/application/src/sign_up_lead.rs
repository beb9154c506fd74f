use crate::error::ApiError;
use crate::protocol::{
    FIELD_REQUEST, FIELD_SIGN_UP_LEAD, GROUP_IDENTITY_SERVICE, STREAM_SIGN_UP_LEAD,
};
use crate::wire;
use identity_domain::jobs::JobProducer;
use identity_domain::ports::{DispatchOptions, FetchSpec, RoutingPolicy, SignUpStore};
use identity_domain::validation::{
    normalize_cellphone, validate_mobile_phone, validate_stored_sign_up, SchemaRegistry,
};
use identity_domain::{RequestContext, SignUpLead};
use identity_proto as proto;
use prost::Message;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Admits a sign-up lead and hands it to the worker tier.
///
/// The flow: sanitize and validate the lead, dedup it against the store
/// (reusing the stored id when policy allows a retry), then run the job
/// protocol against the `SignUpLead` stream and persist whatever the worker
/// handed back. The id returned to the caller is the one on the processed
/// lead, assigned by the worker for first-time sign-ups.
pub struct SignUpLeadUseCase {
    store: Arc<dyn SignUpStore>,
    producer: JobProducer,
    schemas: Arc<SchemaRegistry>,
    cooldown: Duration,
}

impl SignUpLeadUseCase {
    pub fn new(
        store: Arc<dyn SignUpStore>,
        producer: JobProducer,
        schemas: Arc<SchemaRegistry>,
        cooldown: Duration,
    ) -> Self {
        Self {
            store,
            producer,
            schemas,
            cooldown,
        }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        mut lead: SignUpLead,
    ) -> Result<String, ApiError> {
        debug!(correlation_id = %ctx.correlation_id(), "sign-up lead received");

        lead.strip_empty();
        self.schemas.validate_sign_up_lead(&lead)?;

        if let Some(cellphone) = &lead.cellphone {
            let normalized = normalize_cellphone(cellphone);
            validate_mobile_phone(".cellphone", &normalized)?;
            lead.cellphone = Some(normalized);
        }

        if let Some(stored) = self
            .store
            .find_by_contact(lead.cellphone.as_deref(), lead.email.as_deref())
            .await?
        {
            validate_stored_sign_up(&stored, ctx.received_at(), self.cooldown)?;
            // An allowed retry keeps the stored identity.
            lead.sign_up_id = Some(stored.sign_up_id);
        }

        // Lifecycle timestamps are never caller-supplied.
        lead.strip_operation_dates();

        let request = proto::SignUpLeadRequest {
            sign_up_lead: Some(wire::lead_to_proto(&lead)),
        };

        let mut job = self.producer.job();
        info!(
            correlation_id = %ctx.correlation_id(),
            job_id = %job.id(),
            stream = STREAM_SIGN_UP_LEAD,
            "dispatching sign-up lead"
        );
        job.set_field(FIELD_REQUEST, request.encode_to_vec());
        self.producer.push(&mut job).await?;
        self.producer
            .dispatch(
                &mut job,
                DispatchOptions {
                    stream: STREAM_SIGN_UP_LEAD.to_string(),
                    route: RoutingPolicy::Distributed,
                    wait_for: vec![GROUP_IDENTITY_SERVICE.to_string()],
                    reject_on_error: true,
                },
            )
            .await?;
        self.producer.finished(&mut job).await?;

        let mut fields = self
            .producer
            .fetch(&mut job, &[FetchSpec::take(FIELD_SIGN_UP_LEAD)])
            .await?;
        let payload = fields.remove(FIELD_SIGN_UP_LEAD).ok_or_else(|| {
            ApiError::Payload(format!("worker returned no {FIELD_SIGN_UP_LEAD} field"))
        })?;
        let processed = proto::SignUpLead::decode(payload.as_slice())
            .map_err(|e| ApiError::Payload(format!("undecodable processed lead: {e}")))?;
        let mut processed = wire::lead_from_proto(&processed);
        processed.strip_empty();

        let sign_up_id = processed
            .sign_up_id
            .clone()
            .ok_or_else(|| ApiError::Payload("processed lead carries no sign-up id".to_string()))?;

        self.store.upsert(&sign_up_id, &processed.document()).await?;
        info!(
            correlation_id = %ctx.correlation_id(),
            sign_up_id = %sign_up_id,
            "sign-up lead indexed"
        );

        Ok(sign_up_id)
    }
}
