use metrics_exporter_statsd::StatsdBuilder;

#[derive(thiserror::Error, Debug)]
pub enum MetricsError {
    #[error("could not build statsd exporter: {0}")]
    Build(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder is already installed")]
    AlreadyInstalled,
}

/// Installs a global statsd recorder. Without one every metric macro is a no-op,
/// which is what a CI run without a statsd sidecar gets.
pub fn install_statsd(host: &str, port: u16, prefix: &str) -> Result<(), MetricsError> {
    let recorder = StatsdBuilder::from(host, port)
        .with_queue_size(1024)
        .with_buffer_size(512)
        .build(Some(prefix))?;

    metrics::set_global_recorder(recorder).map_err(|_| MetricsError::AlreadyInstalled)?;
    tracing::debug!(host, port, prefix, "Installed statsd metrics recorder");
    Ok(())
}
