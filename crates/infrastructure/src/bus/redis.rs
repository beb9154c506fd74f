use async_trait::async_trait;
use futures::{Stream, StreamExt};
use identity_domain::ports::{BusError, Completion, DispatchOptions, FetchSpec, JobBus};
use identity_shared::config::RedisBusConfig;
use identity_shared::JobId;
use redis::aio::MultiplexedConnection;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

/// Jobs nobody fetched decay after a day.
const JOB_TTL_SECS: u64 = 86_400;

/// Redis adapter for the correlated-job protocol.
///
/// Field payloads go into a hash, dispatch is an XADD onto the job's stream
/// (consumer groups created lazily with MKSTREAM), and completion signals
/// arrive over pub/sub. The completion subscription is armed before the
/// XADD so a worker that answers instantly is still heard.
pub struct RedisJobBus {
    client: redis::Client,
    conn: MultiplexedConnection,
    namespace: String,
    wait_timeout: Duration,
}

impl RedisJobBus {
    pub async fn connect(config: &RedisBusConfig) -> Result<Self, BusError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| BusError::Connection(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| BusError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            conn,
            namespace: config.namespace.clone(),
            wait_timeout: config.wait_timeout(),
        })
    }

    fn job_key(&self, job_id: &JobId) -> String {
        format!("{}:job:{}", self.namespace, job_id)
    }

    fn stream_key(&self, stream: &str) -> String {
        format!("{}:stream:{}", self.namespace, stream)
    }

    fn events_channel(&self, job_id: &JobId) -> String {
        format!("{}:job:{}:events", self.namespace, job_id)
    }

    async fn ensure_group(&self, stream_key: &str, group: &str) -> Result<(), BusError> {
        let mut conn = self.conn.clone();
        // XGROUP CREATE with MKSTREAM creates the stream on first use. New
        // groups start at $: a group only ever sees jobs dispatched after it
        // came into existence.
        let created = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(stream_key)
            .arg(group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async::<_, ()>(&mut conn)
            .await;
        match created {
            Ok(()) => Ok(()),
            // BUSYGROUP means the group already exists.
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(BusError::Dispatch(format!("XGROUP CREATE failed: {e}"))),
        }
    }
}

#[async_trait]
impl JobBus for RedisJobBus {
    async fn push(
        &self,
        job_id: &JobId,
        fields: HashMap<String, Vec<u8>>,
    ) -> Result<(), BusError> {
        if fields.is_empty() {
            return Ok(());
        }
        let key = self.job_key(job_id);
        let mut conn = self.conn.clone();

        let mut pipe = redis::pipe();
        let mut hset = pipe.cmd("HSET").arg(&key);
        for (field, value) in &fields {
            hset = hset.arg(field).arg(value.as_slice());
        }
        hset.ignore();
        pipe.cmd("EXPIRE").arg(&key).arg(JOB_TTL_SECS).ignore();
        pipe.query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| BusError::Push(e.to_string()))?;

        debug!(job_id = %job_id, fields = fields.len(), "job fields pushed");
        Ok(())
    }

    async fn send(&self, job_id: &JobId, options: &DispatchOptions) -> Result<Completion, BusError> {
        let stream_key = self.stream_key(&options.stream);
        for group in &options.wait_for {
            self.ensure_group(&stream_key, group).await?;
        }

        // Arm the subscription first. Only then announce the job.
        let channel = self.events_channel(job_id);
        let mut pubsub = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| BusError::Connection(e.to_string()))?
            .into_pubsub();
        pubsub
            .subscribe(&channel)
            .await
            .map_err(|e| BusError::Connection(e.to_string()))?;
        let signals = pubsub.into_on_message().filter_map(|msg| async move {
            let payload: String = msg.get_payload().ok()?;
            parse_signal(&payload)
        });
        let completion = settle_signals(
            signals,
            options.wait_for.clone(),
            options.reject_on_error,
            self.wait_timeout,
        );

        let mut conn = self.conn.clone();
        redis::cmd("XADD")
            .arg(&stream_key)
            .arg("*")
            .arg("job")
            .arg(job_id.to_string())
            .arg("route")
            .arg(options.route.as_str())
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| BusError::Dispatch(format!("XADD failed: {e}")))?;

        debug!(job_id = %job_id, stream = %options.stream, "job dispatched");
        Ok(completion)
    }

    async fn fetch(
        &self,
        job_id: &JobId,
        specs: &[FetchSpec],
    ) -> Result<HashMap<String, Vec<u8>>, BusError> {
        if specs.is_empty() {
            return Ok(HashMap::new());
        }
        let key = self.job_key(job_id);
        let mut conn = self.conn.clone();

        // One MULTI/EXEC block: reads and the deletes of transient fields
        // land atomically, so no other fetcher observes a half-cleaned job.
        let mut pipe = redis::pipe();
        pipe.atomic();
        for spec in specs {
            pipe.cmd("HGET").arg(&key).arg(&spec.field);
        }
        for spec in specs.iter().filter(|s| s.delete) {
            pipe.cmd("HDEL").arg(&key).arg(&spec.field).ignore();
        }
        let values: Vec<Option<Vec<u8>>> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| BusError::Fetch(e.to_string()))?;

        let mut fields = HashMap::new();
        for (spec, value) in specs.iter().zip(values) {
            match value {
                Some(v) => {
                    fields.insert(spec.field.clone(), v);
                }
                None => warn!(job_id = %job_id, field = %spec.field, "job field missing on fetch"),
            }
        }
        Ok(fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct GroupSignal {
    group: String,
    status: SignalStatus,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SignalStatus {
    Ok,
    Error,
}

/// Foreign chatter on the channel decodes to `None` and is skipped.
fn parse_signal(payload: &str) -> Option<GroupSignal> {
    serde_json::from_str(payload).ok()
}

/// Folds group signals into one completion outcome.
///
/// Resolves `Ok` once every awaited group signalled success. An error signal
/// settles immediately under `reject_on_error`; otherwise the remaining
/// groups are still waited for and the first error is reported at the end.
/// Hitting `timeout` first names the groups still outstanding.
fn settle_signals<S>(
    signals: S,
    groups: Vec<String>,
    reject_on_error: bool,
    timeout: Duration,
) -> Completion
where
    S: Stream<Item = GroupSignal> + Send + 'static,
{
    Box::pin(async move {
        let mut signals = Box::pin(signals);
        let mut remaining: HashSet<String> = groups.into_iter().collect();
        let mut first_error: Option<BusError> = None;

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        while !remaining.is_empty() {
            tokio::select! {
                () = &mut deadline => {
                    let mut groups: Vec<String> = remaining.into_iter().collect();
                    groups.sort_unstable();
                    return Err(BusError::TimedOut { groups });
                }
                signal = signals.next() => {
                    let signal = match signal {
                        Some(s) => s,
                        None => {
                            return Err(BusError::Connection(
                                "signal subscription closed before all groups settled".to_string(),
                            ))
                        }
                    };
                    // Duplicate and unawaited groups are ignored.
                    if !remaining.remove(&signal.group) {
                        continue;
                    }
                    if signal.status == SignalStatus::Error {
                        let err = BusError::GroupFailed {
                            group: signal.group,
                            message: signal.message,
                        };
                        if reject_on_error {
                            return Err(err);
                        }
                        first_error.get_or_insert(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn ok_signal(group: &str) -> GroupSignal {
        GroupSignal {
            group: group.to_string(),
            status: SignalStatus::Ok,
            message: String::new(),
        }
    }

    fn error_signal(group: &str, message: &str) -> GroupSignal {
        GroupSignal {
            group: group.to_string(),
            status: SignalStatus::Error,
            message: message.to_string(),
        }
    }

    #[test]
    fn parses_worker_signals() {
        assert_eq!(
            parse_signal(r#"{"group":"IdentityService","status":"ok"}"#),
            Some(ok_signal("IdentityService"))
        );
        assert_eq!(
            parse_signal(r#"{"group":"IdentityService","status":"error","message":"boom"}"#),
            Some(error_signal("IdentityService", "boom"))
        );
        assert_eq!(parse_signal("not json"), None);
        assert_eq!(parse_signal(r#"{"status":"ok"}"#), None);
    }

    #[tokio::test]
    async fn settles_ok_when_all_groups_answer() {
        let signals = stream::iter(vec![ok_signal("a"), ok_signal("b")]);
        let completion = settle_signals(
            signals,
            vec!["a".to_string(), "b".to_string()],
            true,
            Duration::from_secs(5),
        );
        assert_eq!(completion.await, Ok(()));
    }

    #[tokio::test]
    async fn error_short_circuits_under_reject_on_error() {
        // Group b never answers; the error from a settles the wait anyway.
        let signals = stream::iter(vec![error_signal("a", "boom")]).chain(stream::pending());
        let completion = settle_signals(
            signals,
            vec!["a".to_string(), "b".to_string()],
            true,
            Duration::from_secs(5),
        );
        match completion.await {
            Err(BusError::GroupFailed { group, message }) => {
                assert_eq!(group, "a");
                assert_eq!(message, "boom");
            }
            other => panic!("expected GroupFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn without_reject_on_error_all_groups_are_awaited() {
        let signals = stream::iter(vec![error_signal("a", "boom"), ok_signal("b")]);
        let completion = settle_signals(
            signals,
            vec!["a".to_string(), "b".to_string()],
            false,
            Duration::from_secs(5),
        );
        assert!(matches!(
            completion.await,
            Err(BusError::GroupFailed { group, .. }) if group == "a"
        ));
    }

    #[tokio::test]
    async fn unknown_and_duplicate_groups_are_ignored() {
        let signals = stream::iter(vec![
            ok_signal("stranger"),
            ok_signal("a"),
            ok_signal("a"),
            ok_signal("b"),
        ]);
        let completion = settle_signals(
            signals,
            vec!["a".to_string(), "b".to_string()],
            true,
            Duration::from_secs(5),
        );
        assert_eq!(completion.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_names_outstanding_groups() {
        let signals = stream::iter(vec![ok_signal("a")]).chain(stream::pending());
        let completion = settle_signals(
            signals,
            vec!["a".to_string(), "b".to_string()],
            true,
            Duration::from_secs(30),
        );
        match completion.await {
            Err(BusError::TimedOut { groups }) => assert_eq!(groups, vec!["b".to_string()]),
            other => panic!("expected TimedOut, got {other:?}"),
        }
    }
}
