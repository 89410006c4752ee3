use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hierbus_core::{categorize, resolve, Category, EventBus, EventBusConfig};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
struct L0;
#[derive(Debug)]
struct L1;
#[derive(Debug)]
struct L2;
#[derive(Debug)]
struct L3;
#[derive(Debug)]
struct Leaf(u64);
struct Marker;
struct Audit;

categorize!(L0);
categorize!(Marker);
categorize!(Audit, traits = [Marker]);
categorize!(L1, parent = L0, traits = [Marker]);
categorize!(L2, parent = L1);
categorize!(L3, parent = L2, traits = [Audit]);
categorize!(Leaf, parent = L3, traits = [Audit, Marker]);

fn bus_with_handlers(config: EventBusConfig) -> (EventBus, Rc<Cell<u64>>) {
    let bus = EventBus::with_config(config);
    let total = Rc::new(Cell::new(0u64));
    let levels = [
        Category::of::<L0>(),
        Category::of::<L1>(),
        Category::of::<L2>(),
        Category::of::<L3>(),
        Category::of::<Leaf>(),
        Category::of::<Marker>(),
    ];
    for category in levels {
        let total = total.clone();
        bus.subscribe_to(category, move |_, event| {
            if let Some(leaf) = event.downcast_ref::<Leaf>() {
                total.set(total.get().wrapping_add(leaf.0));
            }
            Ok(())
        });
    }
    (bus, total)
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_deep_taxonomy", |b| {
        b.iter(|| resolve(black_box(Category::of::<Leaf>())))
    });
}

fn bench_publish(c: &mut Criterion) {
    let (cached, _) = bus_with_handlers(EventBusConfig::default());
    c.bench_function("publish_cached_resolution", |b| {
        b.iter(|| cached.publish(black_box(Leaf(1))))
    });

    let (uncached, _) = bus_with_handlers(EventBusConfig {
        cache_resolutions: false,
        ..Default::default()
    });
    c.bench_function("publish_uncached_resolution", |b| {
        b.iter(|| uncached.publish(black_box(Leaf(1))))
    });
}

fn bench_reentrant(c: &mut Criterion) {
    let bus = EventBus::new();
    bus.subscribe::<Leaf, _>(|bus, event| {
        if let Some(Leaf(n)) = event.downcast_ref::<Leaf>() {
            if *n > 0 {
                bus.publish(Leaf(n - 1))?;
            }
        }
        Ok(())
    });
    c.bench_function("publish_reentrant_chain_64", |b| {
        b.iter(|| bus.publish(black_box(Leaf(64))))
    });
}

criterion_group!(benches, bench_resolve, bench_publish, bench_reentrant);
criterion_main!(benches);
