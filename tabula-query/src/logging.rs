//! Logging setup controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `TABULA_DEBUG=true|1|yes` - Enable debug logging
//! - `TABULA_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `TABULA_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! ```rust,no_run
//! use tabula_query::logging;
//!
//! // Call once at startup
//! logging::init();
//! ```
//!
//! Inside the crates, events go through the standard `tracing` macros.
//! Rendered SQL is emitted at `trace` level, execution at `debug`.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Returns `true` if `TABULA_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("TABULA_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Level from `TABULA_LOG_LEVEL`.
///
/// Defaults to "debug" if `TABULA_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("TABULA_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Format from `TABULA_LOG_FORMAT`, "json" unless overridden.
pub fn get_log_format() -> &'static str {
    env::var("TABULA_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Install a global subscriber.
///
/// Subsequent calls are no-ops. Does nothing unless `TABULA_DEBUG` or
/// `TABULA_LOG_LEVEL` is set, or when the `tracing-subscriber` feature is off.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("TABULA_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "tabula={},tabula_query={},tabula_mysql={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            // try_init: a host application may already own the global subscriber
            let result = match get_log_format() {
                "json" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json())
                    .try_init(),
                "compact" => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact())
                    .try_init(),
                _ => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty())
                    .try_init(),
            };

            if result.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "tabula logging initialized"
                );
            }
        }
    });
}

/// Debug event, emitted only when `TABULA_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! tabula_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::__tracing::debug!($($arg)*);
        }
    };
}
