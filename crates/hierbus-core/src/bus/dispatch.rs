//! Dispatch queue and drain loop.

use std::rc::Rc;

use super::EventBus;
use crate::category::Event;
use crate::error::{BusError, Result};
use crate::registry::Subscription;

/// An event together with the handlers captured when it was published
pub(super) struct DispatchRecord {
    event: Rc<dyn Event>,
    snapshot: Vec<Subscription>,
}

impl DispatchRecord {
    pub(super) fn new(event: Rc<dyn Event>, snapshot: Vec<Subscription>) -> Self {
        Self { event, snapshot }
    }

    /// Invoke every captured handler in order, stopping at the first failure
    fn dispatch(&self, bus: &EventBus) -> Result<()> {
        let event = &*self.event;
        tracing::trace!(
            "Dispatching {} to {} handler(s)",
            event.category(),
            self.snapshot.len()
        );

        for subscription in &self.snapshot {
            subscription.invoke(bus, event).map_err(|source| {
                tracing::warn!(
                    "Handler {} for {} failed on {}: {:#}",
                    subscription.id(),
                    subscription.category(),
                    event.category(),
                    source
                );
                BusError::Handler {
                    subscription: subscription.id(),
                    category: subscription.category().name(),
                    event: event.category().name(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

/// Marks the bus as draining; on drop returns it to idle and discards
/// whatever is still queued.
struct DrainGuard<'a> {
    bus: &'a EventBus,
}

impl<'a> DrainGuard<'a> {
    fn engage(bus: &'a EventBus) -> Self {
        bus.polling.set(true);
        Self { bus }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        let discarded = {
            let mut queue = self.bus.queue.borrow_mut();
            let n = queue.len();
            queue.clear();
            n
        };
        if discarded > 0 {
            tracing::warn!("Drain aborted, {} queued dispatch(es) discarded", discarded);
        }
        self.bus.polling.set(false);
    }
}

impl EventBus {
    pub(super) fn enqueue(&self, record: DispatchRecord) {
        let mut queue = self.queue.borrow_mut();
        queue.push_back(record);
        tracing::trace!("Dispatch queued, {} pending", queue.len());
    }

    fn next_record(&self) -> Option<DispatchRecord> {
        self.queue.borrow_mut().pop_front()
    }

    /// Process the queue until it is empty
    pub(super) fn drain(&self) -> Result<()> {
        let _guard = DrainGuard::engage(self);
        let limit = self.config.max_dispatches_per_drain;
        let mut dispatched = 0usize;

        tracing::debug!("Drain started");
        while let Some(record) = self.next_record() {
            if let Some(limit) = limit.filter(|limit| dispatched >= *limit) {
                return Err(BusError::DrainLimitExceeded { limit });
            }
            record.dispatch(self)?;
            dispatched += 1;
        }
        tracing::debug!("Drain finished after {} dispatch(es)", dispatched);
        Ok(())
    }
}
