use crate::client::TrackerApi;
use crate::errors::{Result, TrackerError};
use crate::metrics_defs::{PROBE_FAILURE, REMEDIATION_RUN};
use crate::remediation::Remediation;
use shared::counter;
use std::time::Duration;

pub const DEFAULT_SETTLE: Duration = Duration::from_secs(10);

/// Makes sure the tracking service answers before anything is reconciled.
///
/// A failed probe triggers the remediation once, waits `settle`, and probes
/// one more time. There is no retry loop: the remediation is an external
/// action that should not be fired repeatedly.
pub async fn ensure_available(
    api: &dyn TrackerApi,
    remediation: &dyn Remediation,
    settle: Duration,
) -> Result<()> {
    tracing::info!("Checking connection to the tracking service");
    let Err(err) = api.probe().await else {
        tracing::info!("Tracking service is already running");
        return Ok(());
    };

    counter!(PROBE_FAILURE).increment(1);
    tracing::warn!(error = %err, "Tracking service is not reachable, attempting to start it");

    counter!(REMEDIATION_RUN).increment(1);
    remediation.start().await?;

    tracing::info!(settle_secs = settle.as_secs(), "Service started, waiting for it to settle");
    tokio::time::sleep(settle).await;

    match api.probe().await {
        Ok(()) => {
            tracing::info!("Tracking service is now running");
            Ok(())
        }
        Err(err) => {
            counter!(PROBE_FAILURE).increment(1);
            Err(TrackerError::ServiceUnavailable(format!(
                "still unreachable after remediation: {err}"
            )))
        }
    }
}
