//! Error handling for hierbus
//!
//! Provides the error type surfaced by the bus:
//! - Handler failures (propagated out of the publish call that drained them)
//! - Taxonomy cycles found while resolving categories
//! - Runaway drains cut off by the configured dispatch limit
//! - Configuration parse failures
//!
//! Handlers themselves return `anyhow::Result<()>`, so any error type can be
//! raised from inside a handler and is carried here as the `source`.

use thiserror::Error;

use crate::registry::SubscriptionId;

/// Main error type for hierbus
#[derive(Error, Debug)]
pub enum BusError {
    /// A handler returned an error while its dispatch record was drained.
    ///
    /// Remaining handlers of the record and every queued record were
    /// discarded; the bus is idle again.
    #[error("Handler {subscription} for {category} failed on {event}: {source}")]
    Handler {
        /// The registration whose handler failed.
        subscription: SubscriptionId,
        /// The category the handler was registered under.
        category: &'static str,
        /// The concrete category of the event being dispatched.
        event: &'static str,
        /// The error returned by the handler.
        #[source]
        source: anyhow::Error,
    },

    /// The embedder's taxonomy refers back to a category already on the
    /// ancestry path being walked.
    #[error("Taxonomy cycle detected at category {category}")]
    TaxonomyCycle {
        /// The category that was reached twice on one ancestry path.
        category: &'static str,
    },

    /// A single drain dispatched more records than the configured limit.
    #[error("Drain aborted after {limit} dispatches")]
    DrainLimitExceeded {
        /// The configured per-drain dispatch limit.
        limit: usize,
    },

    /// Bus configuration could not be parsed.
    #[error("Invalid bus configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl BusError {
    /// Check if this error came from a failing handler
    pub fn is_handler_failure(&self) -> bool {
        matches!(self, BusError::Handler { .. })
    }

    /// Check if this error reports a cyclic taxonomy
    pub fn is_taxonomy_cycle(&self) -> bool {
        matches!(self, BusError::TaxonomyCycle { .. })
    }

    /// The subscription whose handler failed, if any
    pub fn failed_subscription(&self) -> Option<SubscriptionId> {
        match self {
            BusError::Handler { subscription, .. } => Some(*subscription),
            _ => None,
        }
    }
}

/// Result type using BusError
pub type Result<T> = std::result::Result<T, BusError>;
