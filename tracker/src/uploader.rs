use crate::client::TrackerApi;
use crate::errors::{Result, TrackerError};
use crate::metrics_defs::{UPLOAD_FAILURE, UPLOAD_SIZE, UPLOAD_SUCCESS};
use crate::types::{ImportScan, ScanUpload};
use shared::{counter, histogram};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Sends one scan report to the ingestion endpoint. Not retried.
///
/// The engagement id is not checked against the service first; the
/// ingestion endpoint is the only validator.
pub async fn upload(api: &dyn TrackerApi, scan: &ScanUpload) -> Result<()> {
    let content = read_report(&scan.file_path).await?;
    let file_name = scan
        .file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());

    tracing::info!(
        scan_type = %scan.scan_type,
        engagement_id = %scan.engagement_id,
        product_id = ?scan.product_id,
        bytes = content.len(),
        "Uploading scan report"
    );
    histogram!(UPLOAD_SIZE).record(content.len() as f64);

    let result = api
        .import_scan(ImportScan {
            scan_type: scan.scan_type.clone(),
            engagement_id: scan.engagement_id,
            product_id: scan.product_id,
            file_name,
            content,
        })
        .await;

    match &result {
        Ok(()) => {
            counter!(UPLOAD_SUCCESS).increment(1);
            tracing::info!(scan_type = %scan.scan_type, "Scan report uploaded");
        }
        Err(_) => counter!(UPLOAD_FAILURE).increment(1),
    }
    result
}

// The handle lives only inside this function, so it is closed before the
// request goes out, whichever way the upload ends.
async fn read_report(path: &Path) -> Result<Vec<u8>> {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(TrackerError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut content = Vec::new();
    file.read_to_end(&mut content).await?;
    Ok(content)
}
