//! Per-thread bus instance.
//!
//! Every thread gets its own lazily created bus. Handlers registered on one
//! thread never see events published on another.

use super::EventBus;

thread_local! {
    static LOCAL_BUS: EventBus = EventBus::new();
}

/// Run `f` against the current thread's bus
///
/// This is the primary way to reach a shared bus without threading a handle
/// through the application. Nested calls from inside handlers are fine: the
/// handler already receives the same bus.
pub fn with_local_bus<R>(f: impl FnOnce(&EventBus) -> R) -> R {
    LOCAL_BUS.with(f)
}

/// Convenience macro to publish an event on the current thread's bus
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::bus::with_local_bus(|bus| bus.publish($event))
    };
}

/// Convenience macro to subscribe to a category on the current thread's bus
#[macro_export]
macro_rules! on_event {
    ($category:ty, $handler:expr) => {
        $crate::bus::with_local_bus(|bus| bus.subscribe::<$category, _>($handler))
    };
}

#[cfg(test)]
mod tests {
    use crate::categorize;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Local(u8);
    categorize!(Local);

    #[test]
    fn test_local_bus_delivery() {
        let hits = Rc::new(Cell::new(0u8));
        let counter = hits.clone();
        crate::on_event!(Local, move |_bus, event| {
            if let Some(local) = event.downcast_ref::<Local>() {
                counter.set(counter.get() + local.0);
            }
            Ok(())
        });

        crate::emit!(Local(2)).expect("Should publish");
        crate::emit!(Local(3)).expect("Should publish");
        assert_eq!(hits.get(), 5);
    }

    #[test]
    fn test_buses_are_per_thread() {
        super::with_local_bus(|bus| {
            bus.subscribe::<Local, _>(|_, _| anyhow::bail!("never on other threads"));
        });

        let published = std::thread::spawn(|| {
            super::with_local_bus(|bus| (bus.subscriber_count(), bus.publish(Local(1)).is_ok()))
        })
        .join()
        .expect("thread");

        assert_eq!(published, (0, true));
    }
}
