use hierbus::{categorize, init_logging_with, Event, EventBus, LogFormat};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct OrderPlaced {
    id: u32,
}

#[derive(Debug)]
struct PriorityOrderPlaced {
    id: u32,
}

#[derive(Debug)]
struct InvoiceRequested {
    order: u32,
}

struct DomainEvent;
struct Audited;

categorize!(DomainEvent);
categorize!(Audited);
categorize!(OrderPlaced, parent = DomainEvent);
categorize!(PriorityOrderPlaced, parent = OrderPlaced, traits = [Audited]);
categorize!(InvoiceRequested, parent = DomainEvent);

fn order_id(event: &dyn Event) -> Option<u32> {
    event
        .downcast_ref::<OrderPlaced>()
        .map(|e| e.id)
        .or_else(|| event.downcast_ref::<PriorityOrderPlaced>().map(|e| e.id))
}

fn main() -> anyhow::Result<()> {
    let format = match std::env::args().nth(1).as_deref() {
        Some("--json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    init_logging_with(format)?;

    let bus = EventBus::new();
    let trail = Rc::new(RefCell::new(Vec::new()));

    let log = trail.clone();
    bus.subscribe::<OrderPlaced, _>(move |bus, event| {
        let id = order_id(event).unwrap_or_default();
        log.borrow_mut().push(format!("billing: order {}", id));
        bus.publish(InvoiceRequested { order: id })?;
        Ok(())
    });

    let log = trail.clone();
    bus.subscribe::<Audited, _>(move |_, event| {
        log.borrow_mut()
            .push(format!("audit: {}", event.category()));
        Ok(())
    });

    let log = trail.clone();
    bus.subscribe::<DomainEvent, _>(move |_, event| {
        log.borrow_mut()
            .push(format!("journal: {:?}", event));
        Ok(())
    });

    let log = trail.clone();
    bus.subscribe::<InvoiceRequested, _>(move |_, event| {
        if let Some(invoice) = event.downcast_ref::<InvoiceRequested>() {
            log.borrow_mut()
                .push(format!("invoicing: order {}", invoice.order));
        }
        Ok(())
    });

    bus.publish(OrderPlaced { id: 1 })?;
    bus.publish(PriorityOrderPlaced { id: 2 })?;

    tracing::info!("Dispatched {} handler call(s)", trail.borrow().len());
    for line in trail.borrow().iter() {
        println!("{}", line);
    }

    Ok(())
}
