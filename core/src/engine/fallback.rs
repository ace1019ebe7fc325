//! The fail-open "swallow and log" adapter, centralized here rather than
//! spread per call site. Wrapped once around each of the `Sentry`
//! coordinator's `ask`/`inform` bodies — every filter `test`/`update`
//! call they make propagates with `?` up to that single wrap, so a
//! store or logic failure anywhere in the chain degrades to "permit"
//! exactly once, with one log line per attempt rather than one per
//! filter.

use std::future::Future;

use crate::errors::SentryError;

/// Await `fut`; on `Err`, log the full error chain via `tracing::error!`
/// and return `sentinel` instead of propagating. `label` identifies the
/// call site in the log line (e.g. `"Sentry::ask"`, `"FilterA::update"`).
pub async fn wrap<T>(label: &str, fut: impl Future<Output = Result<T, SentryError>>, sentinel: T) -> T {
    match fut.await {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, call_site = label, "sentry gate degraded to permit after an internal error");
            sentinel
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[tokio::test]
    async fn returns_ok_value_unchanged() {
        let result = wrap("test", async { Ok::<_, SentryError>(42) }, 0).await;
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn returns_sentinel_on_error() {
        let result = wrap(
            "test",
            async { Err(SentryError::Store(StoreError::Other("boom".into()))) },
            "".to_string(),
        )
        .await;
        assert_eq!(result, "");
    }
}
