/// Initialize structured logging for the session and modem modules.
///
/// Defaults to `info` unless overridden by `ACOUSTIC_RELAY_LOG` — unlike a typical
/// "quiet by default" library, the per-packet progress this crate emits (SYN/DATA/FIN
/// seen, checksum failures, missing sequences) is usually the primary signal an
/// operator needs when a transmission partially fails.
#[cfg(feature = "logging")]
pub fn init() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::builder()
        .with_env_var("ACOUSTIC_RELAY_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Initialize logging when the `logging` feature is not enabled.
///
/// We keep this as a no-op so library consumers can call `acoustic_relay::logging::init()`
/// without needing to pull in `tracing-subscriber`.
#[cfg(not(feature = "logging"))]
pub fn init() {}
