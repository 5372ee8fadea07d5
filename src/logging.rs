//! Application-wide structured logging.
//!
//! Logs are emitted as Bunyan-formatted JSON on the chosen sink, filtered by
//! `RUST_LOG` (falling back to the level passed in). Records from crates that use
//! the `log` facade are bridged into `tracing`.

use tracing::{Subscriber, subscriber::set_global_default};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt::MakeWriter, layer::SubscriberExt};

/// Builds the subscriber without installing it.
///
/// # Parameters
/// - `name`: service name stamped on every record
/// - `env_filter`: default directives when `RUST_LOG` is unset (e.g. `"info"`)
/// - `sink`: where records are written, usually `std::io::stdout`
///
/// # Example
/// ```rust,no_run
/// use deepscan::logging::{get_subscriber, init_subscriber};
///
/// let subscriber = get_subscriber("deepscan".into(), "info".into(), std::io::stdout);
/// init_subscriber(subscriber).expect("logging already initialised");
/// ```
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Installs `subscriber` as the global default and bridges `log` records.
///
/// # Errors
/// Fails if a logger or global subscriber has already been set.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
