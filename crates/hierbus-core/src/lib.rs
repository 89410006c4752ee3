//! # Hierbus Core
//!
//! In-process, single-threaded publish/subscribe event bus with
//! hierarchical event categories.
//! Provides the category taxonomy, the subscription registry and the
//! reentrancy-safe dispatch engine.

pub mod bus;
pub mod category;
pub mod error;
pub mod registry;

pub use bus::{with_local_bus, EventBus, EventBusConfig};
pub use category::{resolve, Categorized, Category, CategoryResolver, Event};
pub use error::{BusError, Result};
pub use registry::{HandlerFn, HandlerResult, Subscription, SubscriptionId, SubscriptionRegistry};
