//! # TL Telemetry
//!
//! Process-wide logging and metrics setup. Library crates only emit
//! `tracing` events and bump counters; binaries call [`init_telemetry`]
//! once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tl_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TL_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `TL_JSON_LOGS` | `false` | JSON log lines |
//! | `TL_CONSOLE_OUTPUT` | `true` | Write logs at all |
//! | `TL_SERVICE_NAME` | `tadaalah` | Service name in the startup line |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, GATE_SCANS, LEDGER_ERRORS, TRANSACTIONS_SUBMITTED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid filter directive or other configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the log subscriber.
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(&config)?;
    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_inc_macro() {
        register_metrics().unwrap();
        let before = LEDGER_ERRORS.with_label_values(&["remote_failure"]).get();
        metric_inc!(LEDGER_ERRORS, &["remote_failure"]);
        assert_eq!(
            LEDGER_ERRORS.with_label_values(&["remote_failure"]).get(),
            before + 1
        );
    }
}
