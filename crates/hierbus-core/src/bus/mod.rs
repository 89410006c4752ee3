//! # Event Bus Module
//!
//! Single-threaded publish/subscribe with hierarchical categories.
//!
//! ## Overview
//!
//! - Handlers subscribe under a category and receive every event whose
//!   resolved categories include it
//! - Handler lists are snapshotted when an event is published
//! - Events published from inside a handler are queued and dispatched after
//!   the current handler chain, in FIFO order
//! - A failing handler aborts the drain; the error surfaces from the
//!   outermost `publish` and the bus returns to idle
//!
//! ## Usage
//!
//! ```rust
//! use hierbus_core::{categorize, Event, EventBus};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Debug)]
//! struct Base { v: i32 }
//! categorize!(Base);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let bus = EventBus::new();
//!
//! let log = seen.clone();
//! bus.subscribe::<Base, _>(move |bus, event| {
//!     let v = event.downcast_ref::<Base>().map(|b| b.v).unwrap_or_default();
//!     log.borrow_mut().push(v);
//!     if v == 10 {
//!         bus.publish(Base { v: 20 })?;
//!     }
//!     Ok(())
//! });
//!
//! bus.publish(Base { v: 10 }).unwrap();
//! assert_eq!(*seen.borrow(), vec![10, 20]);
//! ```

mod config;
mod dispatch;
mod local;

pub use config::*;
pub use local::*;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::category::{Categorized, Category, CategoryResolver, Event};
use crate::error::Result;
use crate::registry::{HandlerResult, SubscriptionId, SubscriptionRegistry};

use dispatch::DispatchRecord;

/// In-process event bus affined to the thread that created it
///
/// The bus is neither `Send` nor `Sync`; use one bus per thread.
pub struct EventBus {
    registry: RefCell<SubscriptionRegistry>,
    resolver: CategoryResolver,
    queue: RefCell<VecDeque<DispatchRecord>>,
    /// True while a drain is in progress further up the stack
    polling: Cell<bool>,
    history: RefCell<VecDeque<Rc<dyn Event>>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            registry: RefCell::new(SubscriptionRegistry::new()),
            resolver: CategoryResolver::new(config.cache_resolutions),
            queue: RefCell::new(VecDeque::new()),
            polling: Cell::new(false),
            history: RefCell::new(VecDeque::new()),
            config,
        }
    }

    /// Subscribe `handler` to category `C` and every category refining it
    pub fn subscribe<C, F>(&self, handler: F) -> SubscriptionId
    where
        C: Categorized,
        F: Fn(&EventBus, &dyn Event) -> HandlerResult + 'static,
    {
        self.subscribe_to(Category::of::<C>(), handler)
    }

    /// Subscribe `handler` to `category`
    ///
    /// Safe to call from inside a handler; the new handler does not see the
    /// event currently being dispatched.
    pub fn subscribe_to<F>(&self, category: Category, handler: F) -> SubscriptionId
    where
        F: Fn(&EventBus, &dyn Event) -> HandlerResult + 'static,
    {
        self.registry
            .borrow_mut()
            .subscribe(category, Rc::new(handler))
    }

    /// Publish an event
    ///
    /// Called from outside a handler, every resulting dispatch (including
    /// events published by handlers along the way) completes before this
    /// returns. Called from inside a handler, the event is queued and this
    /// returns immediately.
    pub fn publish<E: Event>(&self, event: E) -> Result<()> {
        self.publish_rc(Rc::new(event))
    }

    /// Publish an already shared event
    pub fn publish_rc(&self, event: Rc<dyn Event>) -> Result<()> {
        let categories = self.resolver.resolve(event.category())?;

        if self.config.enable_history {
            self.add_to_history(&event);
        }

        let snapshot = self.registry.borrow().snapshot(&categories);
        if snapshot.is_empty() {
            tracing::trace!("No subscribers for {}", event.category());
            return Ok(());
        }

        self.enqueue(DispatchRecord::new(event, snapshot));
        if self.polling.get() {
            return Ok(());
        }
        self.drain()
    }

    /// Ordered categories an event of `category` is delivered under
    pub fn resolve(&self, category: Category) -> Result<Rc<[Category]>> {
        self.resolver.resolve(category)
    }

    /// Get the number of registrations
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Whether a drain is currently running
    pub fn is_draining(&self) -> bool {
        self.polling.get()
    }

    /// Number of dispatch records waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Published events, oldest first (empty unless history is enabled)
    pub fn history(&self) -> Vec<Rc<dyn Event>> {
        self.history.borrow().iter().cloned().collect()
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn add_to_history(&self, event: &Rc<dyn Event>) {
        let mut history = self.history.borrow_mut();
        history.push_back(Rc::clone(event));
        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("pending", &self.pending())
            .field("draining", &self.is_draining())
            .field("config", &self.config)
            .finish()
    }
}
