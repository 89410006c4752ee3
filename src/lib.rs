//! # Hierbus
//!
//! An in-process, single-threaded publish/subscribe event bus with
//! hierarchical event categories:
//! - Handlers registered for a broad category also receive every narrower one
//! - Events published from inside handlers are dispatched in FIFO order after
//!   the current handler chain, never recursively
//! - Handler failures abort the drain and surface from the initiating publish
//!
//! ## Architecture
//!
//! 1. **hierbus-core** - Category taxonomy, resolver, registry and dispatch engine
//! 2. **hierbus** - Re-exports, logging setup and a demo binary

pub use hierbus_core::{
    bus, categorize, category, emit, error, on_event, registry, resolve, with_local_bus,
    BusError, Categorized, Category, CategoryResolver, Event, EventBus, EventBusConfig,
    HandlerFn, HandlerResult, Result, Subscription, SubscriptionId, SubscriptionRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (defaults to INFO)
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::default())
}

/// Initialize logging with the given output format
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_thread_ids(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
