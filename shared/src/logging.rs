use sentry::types::Dsn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes sentry (when a DSN is given) and the global tracing subscriber.
///
/// Log lines go to stderr so stdout stays free for step outputs. The filter
/// comes from `RUST_LOG` and falls back to `info`. The returned guard flushes
/// pending sentry events on drop and must be held until the process exits.
/// The DSN is taken already parsed so a bad value is rejected by the caller's
/// config validation instead of inside `sentry::init`.
pub fn init(sentry_dsn: Option<Dsn>, release: &'static str) -> Option<sentry::ClientInitGuard> {
    let guard = sentry_dsn.map(|dsn| {
        sentry::init(sentry::ClientOptions {
            dsn: Some(dsn),
            release: Some(release.into()),
            ..Default::default()
        })
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(guard.as_ref().map(|_| sentry::integrations::tracing::layer()))
        .try_init();

    guard
}
