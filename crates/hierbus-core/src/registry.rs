//! Subscription registry.
//!
//! Maps each category to the handlers registered for exactly that category,
//! in registration order. The registry only grows.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::bus::EventBus;
use crate::category::{Category, Event};

/// Result returned by handlers
pub type HandlerResult = anyhow::Result<()>;

/// Type alias for handler functions
///
/// Handlers receive the bus that dispatches to them so they can publish or
/// subscribe reentrantly.
pub type HandlerFn = Rc<dyn Fn(&EventBus, &dyn Event) -> HandlerResult>;

/// Identifier of one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// A handler registered under a category
#[derive(Clone)]
pub struct Subscription {
    id: SubscriptionId,
    category: Category,
    index: usize,
    handler: HandlerFn,
}

impl Subscription {
    /// Registration identifier
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Category the handler was registered under
    pub fn category(&self) -> Category {
        self.category
    }

    /// Position among the handlers of the same category
    pub fn index(&self) -> usize {
        self.index
    }

    /// Invoke the handler with `event`
    pub fn invoke(&self, bus: &EventBus, event: &dyn Event) -> HandlerResult {
        (self.handler)(bus, event)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("index", &self.index)
            .finish()
    }
}

/// Category to handler-list map
#[derive(Default)]
pub struct SubscriptionRegistry {
    by_category: HashMap<Category, Vec<Subscription>>,
    /// Categories in order of their first registration
    order: Vec<Category>,
    total: usize,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` under `category`
    ///
    /// Registering the same handler twice is allowed; each registration is
    /// invoked separately.
    pub fn subscribe(&mut self, category: Category, handler: HandlerFn) -> SubscriptionId {
        let id = SubscriptionId::new();
        let list = self.by_category.entry(category).or_insert_with(|| {
            self.order.push(category);
            Vec::new()
        });
        let index = list.len();
        list.push(Subscription {
            id,
            category,
            index,
            handler,
        });
        self.total += 1;
        tracing::debug!("Subscription {} added for {} at {}", id, category, index);
        id
    }

    /// Handlers registered for exactly `category`, oldest first
    pub fn handlers_for(&self, category: Category) -> &[Subscription] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concatenate the handlers of `categories`, in order
    pub fn snapshot(&self, categories: &[Category]) -> Vec<Subscription> {
        categories
            .iter()
            .flat_map(|c| self.handlers_for(*c).iter().cloned())
            .collect()
    }

    /// Total number of registrations
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Categories that have at least one handler, in first-registration order
    pub fn categories(&self) -> &[Category] {
        &self.order
    }
}

impl fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("categories", &self.order)
            .field("subscriptions", &self.total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize;
    use std::cell::RefCell;

    struct Base;
    struct Other;
    categorize!(Base);
    categorize!(Other);

    fn recording(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> HandlerFn {
        let log = log.clone();
        Rc::new(move |_bus: &EventBus, _event: &dyn Event| {
            log.borrow_mut().push(name);
            Ok(())
        })
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.handlers_for(Category::of::<Base>()).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insertion_order_per_category() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SubscriptionRegistry::new();
        let base = Category::of::<Base>();

        registry.subscribe(base, recording(&log, "first"));
        registry.subscribe(Category::of::<Other>(), recording(&log, "other"));
        registry.subscribe(base, recording(&log, "second"));

        let handlers = registry.handlers_for(base);
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].index(), 0);
        assert_eq!(handlers[1].index(), 1);
        assert_eq!(handlers[0].category(), base);
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.categories(),
            &[base, Category::of::<Other>()]
        );
    }

    #[test]
    fn test_duplicate_handlers_are_kept() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SubscriptionRegistry::new();
        let handler = recording(&log, "dup");
        let base = Category::of::<Base>();

        let a = registry.subscribe(base, handler.clone());
        let b = registry.subscribe(base, handler);

        assert_ne!(a, b);
        assert_eq!(registry.handlers_for(base).len(), 2);
    }

    #[test]
    fn test_snapshot_follows_category_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SubscriptionRegistry::new();
        let base = Category::of::<Base>();
        let other = Category::of::<Other>();

        registry.subscribe(base, recording(&log, "base"));
        registry.subscribe(other, recording(&log, "other"));

        let snapshot = registry.snapshot(&[other, base]);
        let categories: Vec<Category> = snapshot.iter().map(|s| s.category()).collect();
        assert_eq!(categories, vec![other, base]);
    }

    #[test]
    fn test_subscription_id_display() {
        let id = SubscriptionId::new();
        let text = id.to_string();
        assert!(text.starts_with("Sub("));
        assert_eq!(text.len(), "Sub()".len() + 8);
    }
}
