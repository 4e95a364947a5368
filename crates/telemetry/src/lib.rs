//! Tracing subscriber bootstrap.

use ideas_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber described by `settings`.
///
/// `RUST_LOG` takes precedence over `settings.log_level`. Logs go to stderr
/// so command output on stdout stays clean. Returns `false` when a
/// subscriber was already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<bool> {
    let filter = build_filter(settings)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(
            target: "ideas-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    Ok(installed)
}

fn build_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.log_level).map_err(|err| {
            anyhow::anyhow!("invalid log level '{}': {}", settings.log_level, err)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_log_level() {
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            log_level: "ideas=loud".to_string(),
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_filter(&settings).is_err());
        }
    }

    #[test]
    fn second_init_is_a_no_op() {
        let settings = TelemetrySettings::default();
        init(&settings).unwrap();
        assert!(!init(&settings).unwrap());
    }
}
