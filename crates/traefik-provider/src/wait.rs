//! Wait-for-condition polling
//!
//! After a create or update the provider can block until a JSONPath
//! expression on the live object yields an expected value; after a delete it
//! can block until the object is gone. Both use the same fixed-interval loop
//! with a hard deadline: the final observation happens no later than the
//! configured timeout.

use std::future::Future;
use std::time::Duration;

use kube::core::ApiResource;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use traefik_crds::{FieldPath, Validate, ValidationIssue};

use crate::api::{ObjectApi, describe};
use crate::error::{ProviderError, Result};
use crate::import::ImportId;
use crate::jsonpath::JsonPath;

/// Lower bound on the sleep between two observations
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Upper bound on any wait
pub const MAX_WAIT_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

fn validate_timing(
    timeout: Duration,
    poll_interval: Duration,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) {
    if timeout > MAX_WAIT_TIMEOUT {
        issues.push(ValidationIssue::new(
            path.child("timeout"),
            format!(
                "timeout must be at most {}h",
                MAX_WAIT_TIMEOUT.as_secs() / 3600
            ),
        ));
    }
    if poll_interval.is_zero() {
        issues.push(ValidationIssue::new(
            path.child("poll_interval"),
            "poll interval must be greater than zero",
        ));
    }
}

fn default_wait_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

/// Block until `jsonpath` evaluates to `value` on the live object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitCondition {
    /// kubectl-style JSONPath, e.g. `{.status.conditions[?(@.type=="Ready")].status}`
    pub jsonpath: String,

    /// Expected value of the first match
    pub value: String,

    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl WaitCondition {
    pub fn new(jsonpath: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            jsonpath: jsonpath.into(),
            value: value.into(),
            timeout: default_wait_timeout(),
            poll_interval: default_poll_interval(),
        }
    }

    fn describe(&self) -> String {
        format!("{}={}", self.jsonpath, self.value)
    }
}

impl Validate for WaitCondition {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        if let Err(err) = JsonPath::parse(&self.jsonpath) {
            issues.push(ValidationIssue::new(path.child("jsonpath"), err.to_string()));
        }
        validate_timing(self.timeout, self.poll_interval, path, issues);
    }
}

/// Block until the object no longer exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitForDelete {
    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for WaitForDelete {
    fn default() -> Self {
        Self {
            timeout: default_wait_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

impl Validate for WaitForDelete {
    fn validate(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) {
        validate_timing(self.timeout, self.poll_interval, path, issues);
    }
}

/// Run `check` every `interval` until it returns `true` or `timeout` elapses
///
/// Returns `Ok(false)` on timeout. The last check runs exactly at the
/// deadline, never after it; errors from `check` end the loop immediately.
/// `timeout` is capped at [`MAX_WAIT_TIMEOUT`].
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout.min(MAX_WAIT_TIMEOUT);
    let interval = interval.max(MIN_POLL_INTERVAL);

    loop {
        if check().await? {
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// Poll the object until `condition` holds
///
/// A missing object counts as "not yet".
pub async fn wait_for_condition(
    api: &dyn ObjectApi,
    resource: &ApiResource,
    id: &ImportId,
    condition: &WaitCondition,
) -> Result<()> {
    let path = JsonPath::parse(&condition.jsonpath)?;
    let target = describe(resource, id);
    tracing::debug!(
        %target,
        condition = %condition.describe(),
        timeout = ?condition.timeout,
        "waiting for condition"
    );

    let (path, observed) = (&path, &target);
    let satisfied = poll_until(condition.timeout, condition.poll_interval, || async move {
        let satisfied = api
            .get(resource, id)
            .await?
            .is_some_and(|object| path.matches(&object, &condition.value));
        tracing::trace!(target = %observed, satisfied, "observed");
        Ok(satisfied)
    })
    .await?;

    if satisfied {
        tracing::debug!(%target, "condition met");
        Ok(())
    } else {
        tracing::warn!(%target, condition = %condition.describe(), "condition not met in time");
        Err(ProviderError::Timeout {
            target,
            condition: condition.describe(),
            timeout: condition.timeout,
        })
    }
}

/// Poll until the object is gone
pub async fn wait_for_deletion(
    api: &dyn ObjectApi,
    resource: &ApiResource,
    id: &ImportId,
    wait: &WaitForDelete,
) -> Result<()> {
    let target = describe(resource, id);
    tracing::debug!(%target, timeout = ?wait.timeout, "waiting for deletion");

    let gone = poll_until(wait.timeout, wait.poll_interval, || async move {
        Ok(api.get(resource, id).await?.is_none())
    })
    .await?;

    if gone {
        Ok(())
    } else {
        Err(ProviderError::Timeout {
            target,
            condition: "deletion".to_string(),
            timeout: wait.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockObjectApi;
    use crate::model::DeletionPropagation;
    use kube::CustomResourceExt;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use traefik_crds::TraefikService;

    fn service_object(ready: &str) -> serde_json::Value {
        json!({
            "apiVersion": "traefik.io/v1alpha1",
            "kind": "TraefikService",
            "metadata": {"name": "canary", "namespace": "web"},
            "spec": {"weighted": {"services": [{"name": "v1"}]}},
            "status": {"conditions": [{"type": "Ready", "status": ready}]}
        })
    }

    fn ready_condition() -> WaitCondition {
        WaitCondition {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
            ..WaitCondition::new(r#"{.status.conditions[?(@.type=="Ready")].status}"#, "True")
        }
    }

    #[test]
    fn test_defaults() {
        let cond: WaitCondition =
            serde_json::from_value(json!({"jsonpath": ".status.phase", "value": "Ready"})).unwrap();
        assert_eq!(cond.timeout, Duration::from_secs(30));
        assert_eq!(cond.poll_interval, Duration::from_secs(5));

        let cond: WaitCondition = serde_json::from_value(json!({
            "jsonpath": ".status.phase",
            "value": "Ready",
            "timeout": "2m",
            "poll_interval": "500ms"
        }))
        .unwrap();
        assert_eq!(cond.timeout, Duration::from_secs(120));
        assert_eq!(cond.poll_interval, Duration::from_millis(500));

        assert_eq!(WaitForDelete::default().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validate() {
        let mut cond = WaitCondition::new(".items[0:1]", "x");
        cond.poll_interval = Duration::ZERO;
        let issues = cond.validation_issues(&FieldPath::root("wait_for_upsert").index(0));
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["wait_for_upsert[0].jsonpath", "wait_for_upsert[0].poll_interval"]
        );

        assert!(ready_condition()
            .validation_issues(&FieldPath::root("w"))
            .is_empty());
    }

    #[test]
    fn test_validate_rejects_huge_timeouts() {
        let cond: WaitCondition = serde_json::from_value(json!({
            "jsonpath": ".status.phase",
            "value": "Ready",
            "timeout": "500000000000y"
        }))
        .unwrap();
        let issues = cond.validation_issues(&FieldPath::root("wait_for_upsert").index(0));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path.as_str(), "wait_for_upsert[0].timeout");
        assert_eq!(issues[0].message, "timeout must be at most 24h");

        let wait = WaitForDelete {
            timeout: Duration::MAX,
            ..Default::default()
        };
        let issues = wait.validation_issues(&FieldPath::root("wait_for_delete"));
        assert_eq!(issues[0].path.as_str(), "wait_for_delete.timeout");

        let wait = WaitForDelete {
            timeout: MAX_WAIT_TIMEOUT,
            ..Default::default()
        };
        assert!(wait.validation_issues(&FieldPath::root("w")).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_caps_timeout() {
        let checks = &AtomicUsize::new(0);
        let start = Instant::now();

        let satisfied = poll_until(Duration::MAX, Duration::from_secs(60 * 60), || async move {
            checks.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
        .await
        .unwrap();

        assert!(!satisfied);
        assert_eq!(start.elapsed(), MAX_WAIT_TIMEOUT);
        assert_eq!(checks.load(Ordering::SeqCst), 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_stops_at_deadline() {
        let checks = &AtomicUsize::new(0);
        let start = Instant::now();

        let satisfied = poll_until(Duration::from_secs(30), Duration::from_secs(5), || async move {
            checks.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
        .await
        .unwrap();

        assert!(!satisfied);
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        // t = 0, 5, 10, 15, 20, 25, 30
        assert_eq!(checks.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_last_sleep_is_shortened() {
        let checks = &AtomicUsize::new(0);
        let start = Instant::now();

        poll_until(Duration::from_secs(30), Duration::from_secs(7), || async move {
            checks.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
        .await
        .unwrap();

        // t = 0, 7, 14, 21, 28, 30
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert_eq!(checks.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_zero_timeout_checks_once() {
        let checks = &AtomicUsize::new(0);
        let satisfied = poll_until(Duration::ZERO, Duration::from_secs(5), || async move {
            checks.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
        .await
        .unwrap();
        assert!(!satisfied);
        assert_eq!(checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_returns_early() {
        let checks = &AtomicUsize::new(0);
        let start = Instant::now();

        let satisfied = poll_until(Duration::from_secs(30), Duration::from_secs(5), || async move {
            Ok(checks.fetch_add(1, Ordering::SeqCst) == 2)
        })
        .await
        .unwrap();

        assert!(satisfied);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_propagates_errors() {
        let checks = &AtomicUsize::new(0);
        let err = poll_until(Duration::from_secs(30), Duration::from_secs(5), || async move {
            checks.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Offline)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ProviderError::Offline));
        assert_eq!(checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_condition_met_after_update() {
        let api = MockObjectApi::new();
        let ar = TraefikService::api_resource();
        let id = ImportId::new("web", "canary");
        api.insert(&ar, &id, service_object("False"));

        let controller = {
            let api = api.clone();
            let ar = ar.clone();
            let id = id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(12)).await;
                api.update(&ar, &id, |obj| {
                    obj["status"]["conditions"][0]["status"] = json!("True");
                });
            })
        };

        let start = Instant::now();
        wait_for_condition(&api, &ar, &id, &ready_condition())
            .await
            .unwrap();
        controller.await.unwrap();

        // Observed at t = 0, 5, 10 (False) then 15 (True)
        assert_eq!(start.elapsed(), Duration::from_secs(15));
        assert_eq!(api.operation_counts().gets, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_condition_timeout() {
        let api = MockObjectApi::new();
        let ar = TraefikService::api_resource();
        let id = ImportId::new("web", "canary");
        api.insert(&ar, &id, service_object("False"));

        let start = Instant::now();
        let err = wait_for_condition(&api, &ar, &id, &ready_condition())
            .await
            .unwrap_err();

        assert!(start.elapsed() <= Duration::from_secs(30));
        assert_eq!(err.summary(), "Timeout while waiting for condition");
        assert!(err.to_string().contains("TraefikService web/canary"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_condition_missing_object_keeps_polling() {
        let api = MockObjectApi::new();
        let ar = TraefikService::api_resource();
        let id = ImportId::new("web", "canary");

        let err = wait_for_condition(&api, &ar, &id, &ready_condition())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { .. }));
        assert_eq!(api.operation_counts().gets, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_deletion() {
        let api = Arc::new(MockObjectApi::new());
        let ar = TraefikService::api_resource();
        let id = ImportId::new("web", "canary");
        api.insert(&ar, &id, service_object("True"));
        api.linger_after_delete(&ar, &id, 2);
        api.delete(&ar, &id, DeletionPropagation::Foreground)
            .await
            .unwrap();

        let start = Instant::now();
        wait_for_deletion(api.as_ref(), &ar, &id, &WaitForDelete::default())
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_deletion_timeout() {
        let api = MockObjectApi::new();
        let ar = TraefikService::api_resource();
        let id = ImportId::new("web", "canary");
        api.insert(&ar, &id, service_object("True"));

        let wait = WaitForDelete {
            timeout: Duration::from_secs(3),
            poll_interval: Duration::from_secs(1),
        };
        let start = Instant::now();
        let err = wait_for_deletion(&api, &ar, &id, &wait).await.unwrap_err();
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert!(err.to_string().contains("deletion"));
    }
}
