use crate::client::TrackerApi;
use crate::errors::{Result, TrackerError};
use crate::metrics_defs::{RECONCILE_CREATED, RECONCILE_REUSED};
use crate::types::{NewEngagement, NewProduct, ResolvedIds, ResourceId, ResourceKind};
use serde::Serialize;
use shared::counter;

/// Finds a resource matching `filter` or creates it from `payload`.
///
/// When the lookup reports any match, the first listed result wins and no
/// creation is issued. Lookup and creation failures are returned as-is and
/// never retried. Two runs racing on an empty collection can both create;
/// closing that needs a uniqueness constraint on the service side.
pub async fn find_or_create<P>(
    api: &dyn TrackerApi,
    kind: ResourceKind,
    filter: &[(&str, String)],
    payload: &P,
) -> Result<ResourceId>
where
    P: Serialize + ?Sized,
{
    let listing = api.list(kind, filter).await?;

    if listing.count > 0 {
        let first = listing.results.first().ok_or_else(|| {
            TrackerError::MalformedResponse(format!(
                "{kind} lookup reported count {} but returned no results",
                listing.count
            ))
        })?;
        counter!(RECONCILE_REUSED, "kind" => kind.as_str()).increment(1);
        tracing::info!(%kind, id = %first.id, count = listing.count, "Found existing resource");
        return Ok(first.id);
    }

    tracing::info!(%kind, ?filter, "No existing resource found, creating one");
    let payload =
        serde_json::to_value(payload).map_err(|e| TrackerError::InvalidPayload(e.to_string()))?;
    let created = api.create(kind, &payload).await?;

    counter!(RECONCILE_CREATED, "kind" => kind.as_str()).increment(1);
    tracing::info!(%kind, id = %created.id, "Created resource");
    Ok(created.id)
}

/// Resolves the product named after the project, then an engagement under it.
///
/// The engagement lookup is scoped by product id only, so any engagement the
/// product already has is reused regardless of its name or status.
pub async fn reconcile_project(api: &dyn TrackerApi, project_name: &str) -> Result<ResolvedIds> {
    let product_id = find_or_create(
        api,
        ResourceKind::Product,
        &[("name", project_name.to_string())],
        &NewProduct::for_project(project_name),
    )
    .await?;

    let engagement_id = find_or_create(
        api,
        ResourceKind::Engagement,
        &[("product", product_id.to_string())],
        &NewEngagement::for_product(product_id),
    )
    .await?;

    Ok(ResolvedIds {
        product_id,
        engagement_id,
    })
}
