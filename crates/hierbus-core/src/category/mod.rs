//! # Category Module
//!
//! Declares the event taxonomy the bus dispatches over.
//!
//! ## Overview
//!
//! Every category is a Rust type. A type joins the taxonomy by implementing
//! [`Categorized`], which names its direct parent and the trait categories it
//! directly refines. The resolver walks those declarations upward, so the
//! taxonomy stays open: any crate can add categories without touching the bus.
//!
//! ## Usage
//!
//! ```rust
//! use hierbus_core::{categorize, Category};
//!
//! #[derive(Debug)]
//! pub struct Base { pub v: i32 }
//! #[derive(Debug)]
//! pub struct Derived { pub v: i32 }
//! pub struct Tagged;
//!
//! categorize!(Base);
//! categorize!(Tagged);
//! categorize!(Derived, parent = Base, traits = [Tagged]);
//!
//! let derived = Category::of::<Derived>();
//! assert_eq!(derived.parent(), Some(Category::of::<Base>()));
//! assert_eq!(derived.traits(), vec![Category::of::<Tagged>()]);
//! ```

mod resolver;

pub use resolver::*;

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A type that occupies a place in the event taxonomy
pub trait Categorized: 'static {
    /// Human-readable category name used in logs and errors
    fn name() -> &'static str {
        type_name::<Self>()
    }

    /// The direct parent category, if any
    fn parent() -> Option<Category> {
        None
    }

    /// Trait categories this category directly refines, in declaration order
    fn traits() -> Vec<Category> {
        Vec::new()
    }
}

/// Token identifying one category of the taxonomy
///
/// Equality and hashing only consider the identity of the declaring type.
#[derive(Clone, Copy)]
pub struct Category {
    id: TypeId,
    name: &'static str,
    parent: fn() -> Option<Category>,
    traits: fn() -> Vec<Category>,
}

impl Category {
    /// The category declared by `T`
    pub fn of<T: Categorized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::name(),
            parent: T::parent,
            traits: T::traits,
        }
    }

    /// Fully qualified category name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direct parent category
    pub fn parent(&self) -> Option<Category> {
        (self.parent)()
    }

    /// Directly refined trait categories
    pub fn traits(&self) -> Vec<Category> {
        (self.traits)()
    }

    /// Whether this category is the one declared by `T`
    pub fn is<T: Categorized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Category").field(&self.name).finish()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.name.rsplit("::").next().unwrap_or(self.name);
        write!(f, "{}", short)
    }
}

/// An immutable value that can be published on the bus
///
/// Implemented for every [`Categorized`] type that is also `Debug`; the
/// concrete category of an event is the category of its type.
pub trait Event: Any + fmt::Debug {
    /// The concrete category of this event
    fn category(&self) -> Category;

    /// Access the event as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl<T> Event for T
where
    T: Categorized + fmt::Debug,
{
    fn category(&self) -> Category {
        Category::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Event {
    /// Check whether the concrete event type is `T`
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to the concrete event type
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Declare a type's place in the taxonomy
///
/// ```rust,ignore
/// categorize!(Base);
/// categorize!(Derived, parent = Base);
/// categorize!(Derived, parent = Base, traits = [Tagged, Audited]);
/// categorize!(Audited, traits = [Tagged]);
/// ```
#[macro_export]
macro_rules! categorize {
    ($ty:ty $(, parent = $parent:ty)? $(, traits = [$($tr:ty),* $(,)?])?) => {
        impl $crate::Categorized for $ty {
            $(
                fn parent() -> ::std::option::Option<$crate::Category> {
                    ::std::option::Option::Some($crate::Category::of::<$parent>())
                }
            )?
            $(
                fn traits() -> ::std::vec::Vec<$crate::Category> {
                    ::std::vec![$($crate::Category::of::<$tr>()),*]
                }
            )?
        }
    };
}
