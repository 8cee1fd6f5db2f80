use crate::client::TrackerApi;
use crate::errors::Result;
use crate::prober::ensure_available;
use crate::reconciler::reconcile_project;
use crate::remediation::Remediation;
use crate::types::ResolvedIds;
use std::time::Duration;

/// Runs the setup step: availability check, then product and engagement
/// reconciliation. A failure at any stage stops the run there; resources
/// created before the failure are left in place.
pub async fn run_setup(
    api: &dyn TrackerApi,
    remediation: &dyn Remediation,
    settle: Duration,
    project_name: &str,
) -> Result<ResolvedIds> {
    ensure_available(api, remediation, settle).await?;

    tracing::info!(project = project_name, "Resolving product and engagement");
    let ids = reconcile_project(api, project_name).await?;
    tracing::info!(
        product_id = %ids.product_id,
        engagement_id = %ids.engagement_id,
        "Product and engagement resolved"
    );
    Ok(ids)
}
