//! Parent-chain queries over an in-memory snapshot of the category forest.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::features::categories::error::CategoryError;
use crate::features::categories::models::ParentLink;

/// id → parent link index, built once per request from a single query
#[derive(Debug, Default)]
pub struct ParentIndex {
    links: HashMap<Uuid, ParentLink>,
}

impl ParentIndex {
    pub fn new(links: impl IntoIterator<Item = ParentLink>) -> Self {
        Self {
            links: links.into_iter().map(|l| (l.id, l)).collect(),
        }
    }

    pub fn parent_of(&self, id: Uuid) -> Option<Uuid> {
        self.links.get(&id).and_then(|l| l.parent_id)
    }

    pub fn name_of(&self, id: Uuid) -> Option<&str> {
        self.links.get(&id).map(|l| l.name.as_str())
    }

    /// `node` followed by its parent, grandparent, ... up to a root.
    /// Stops early if the stored chain revisits a node.
    pub fn ancestry(&self, node: Uuid) -> Ancestry<'_> {
        Ancestry {
            index: self,
            next: Some(node),
            visited: HashSet::new(),
        }
    }

    /// True if `candidate` appears in `node`'s parent chain, `node` included
    pub fn is_ancestor_of(&self, candidate: Uuid, node: Uuid) -> bool {
        self.ancestry(node).any(|id| id == candidate)
    }

    /// Number of parent hops from `node` to a root
    pub fn level(&self, node: Uuid) -> i32 {
        let hops = self.ancestry(node).count().saturating_sub(1);
        i32::try_from(hops).unwrap_or(i32::MAX)
    }

    /// Validate making `new_parent` the parent of `category`
    pub fn check_reparent(&self, category: Uuid, new_parent: Uuid) -> Result<(), CategoryError> {
        if category == new_parent {
            return Err(CategoryError::SelfParent);
        }
        if self.is_ancestor_of(category, new_parent) {
            return Err(CategoryError::CircularReference);
        }
        Ok(())
    }
}

pub struct Ancestry<'a> {
    index: &'a ParentIndex,
    next: Option<Uuid>,
    visited: HashSet<Uuid>,
}

impl Iterator for Ancestry<'_> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Uuid> {
        let current = self.next?;
        if !self.visited.insert(current) {
            self.next = None;
            return None;
        }
        self.next = self.index.parent_of(current);
        Some(current)
    }
}
