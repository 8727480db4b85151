// Tracing setup for the command-line tools

use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

//-----------------------------------------------------------------------------
// Tracing Initialization
//-----------------------------------------------------------------------------

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `log_level`, which defaults to `"info"`. Logs go to
/// stderr so that documents written to stdout stay clean.
pub fn init_tracing(log_level: Option<&str>, json_output: bool) -> Result<()> {
    tracing::subscriber::set_global_default(build_subscriber(log_level, json_output)?)?;
    Ok(())
}

/// Subscriber writing to stderr, as JSON lines or human-readable text
pub fn build_subscriber(
    log_level: Option<&str>,
    json_output: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))?;

    let subscriber = Registry::default().with(env_filter);

    if json_output {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true);
        Ok(Box::new(subscriber.with(json_layer)))
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);
        Ok(Box::new(subscriber.with(fmt_layer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_is_installed_once() {
        let _ = init_tracing(Some("debug"), false);
        tracing::debug!("tracing initialized");
        assert!(init_tracing(Some("debug"), false).is_err());
    }

    #[test]
    fn test_json_subscriber_records_events() {
        let subscriber = build_subscriber(Some("trace"), true).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::ERROR));
            tracing::info!(cache = "foo", "json output");
        });
    }
}
