//! Category resolution.
//!
//! Turns a concrete category into the ordered set of categories an event of
//! that category belongs to: the category itself, then its direct traits and
//! their ancestry, then its parent chain.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::Category;
use crate::error::{BusError, Result};

/// Resolve `category` to itself plus every broader category it refines
///
/// The order is deterministic: the concrete category first, then each direct
/// trait, then the ancestry of those traits, then the parent, repeating the
/// same walk for every ancestor. Each category appears once.
pub fn resolve(category: Category) -> Result<Vec<Category>> {
    let mut walk = Walk::default();
    walk.visit(category)?;
    Ok(walk.ordered)
}

#[derive(Default)]
struct Walk {
    ordered: Vec<Category>,
    seen: HashSet<Category>,
    path: Vec<Category>,
}

impl Walk {
    fn insert(&mut self, category: Category) {
        if self.seen.insert(category) {
            self.ordered.push(category);
        }
    }

    fn check_acyclic(&self, category: Category) -> Result<()> {
        if self.path.contains(&category) {
            tracing::error!("Taxonomy cycle at {}", category);
            return Err(BusError::TaxonomyCycle {
                category: category.name(),
            });
        }
        Ok(())
    }

    /// Walk `start` and its parent chain; `path` holds the ancestry above `start`.
    fn visit(&mut self, start: Category) -> Result<()> {
        let depth = self.path.len();
        let mut current = Some(start);

        while let Some(category) = current {
            self.check_acyclic(category)?;
            self.path.push(category);
            self.insert(category);

            let traits = category.traits();
            for t in &traits {
                self.check_acyclic(*t)?;
                self.insert(*t);
            }
            for t in traits {
                self.visit(t)?;
            }

            current = category.parent();
        }

        self.path.truncate(depth);
        Ok(())
    }
}

/// Memoising resolver owned by a bus
///
/// Resolutions never change for a given category, so the first result is
/// kept and shared by later publishes.
#[derive(Debug, Default)]
pub struct CategoryResolver {
    cache: RefCell<HashMap<Category, Rc<[Category]>>>,
    caching: bool,
}

impl CategoryResolver {
    /// Create a resolver, optionally caching resolutions
    pub fn new(caching: bool) -> Self {
        Self {
            cache: RefCell::new(HashMap::new()),
            caching,
        }
    }

    /// Resolve `category`, consulting the cache first
    pub fn resolve(&self, category: Category) -> Result<Rc<[Category]>> {
        if let Some(hit) = self.cache.borrow().get(&category) {
            return Ok(Rc::clone(hit));
        }

        let resolved: Rc<[Category]> = resolve(category)?.into();
        if self.caching {
            self.cache
                .borrow_mut()
                .insert(category, Rc::clone(&resolved));
        }
        Ok(resolved)
    }

    /// Number of cached resolutions
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}
