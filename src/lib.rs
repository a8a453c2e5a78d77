pub mod config;
pub mod models;
pub mod calibration; // Tolerance table + accuracy judgement
pub mod pipeline; // Meter-face OCR extraction + capture sessions

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Call once from the host application.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing() -> bool {
    let initialized = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    }
    initialized
}
