use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::error::CategoryError;
use crate::features::categories::hierarchy::ParentIndex;
use crate::features::categories::models::{Category, CategoryFilter};
use crate::features::categories::repositories::CategoryStore;

/// Arena of category records linked by `parent_id`.
///
/// Children keep the order of the input slice, so a listing sorted by
/// `sort_order` yields children sorted the same way. Nodes whose parent is not
/// part of the input are not reachable from any root.
struct CategoryForest {
    nodes: Vec<Option<CategoryResponseDto>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    by_id: HashMap<Uuid, usize>,
}

impl CategoryForest {
    fn assemble(
        categories: Vec<Category>,
        index: &ParentIndex,
        article_counts: &HashMap<Uuid, i64>,
    ) -> Self {
        let by_id: HashMap<Uuid, usize> = categories
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.id, slot))
            .collect();

        let mut children = vec![Vec::new(); categories.len()];
        let mut roots = Vec::new();
        for (slot, category) in categories.iter().enumerate() {
            match category.parent_id {
                None => roots.push(slot),
                Some(parent_id) => {
                    if let Some(&parent_slot) = by_id.get(&parent_id) {
                        children[parent_slot].push(slot);
                    }
                }
            }
        }

        let nodes = categories
            .into_iter()
            .map(|c| {
                let count = article_counts.get(&c.id).copied().unwrap_or(0);
                Some(CategoryResponseDto::from_category(c, index, count))
            })
            .collect();

        Self {
            nodes,
            children,
            roots,
            by_id,
        }
    }

    /// Moves the node out of the arena with its reachable descendants attached.
    /// Each node is taken at most once, so a corrupt cycle cannot recurse forever.
    fn take_subtree(&mut self, slot: usize) -> Option<CategoryResponseDto> {
        let mut node = self.nodes.get_mut(slot)?.take()?;
        let child_slots = std::mem::take(&mut self.children[slot]);
        node.children = child_slots
            .into_iter()
            .filter_map(|child| self.take_subtree(child))
            .collect();
        Some(node)
    }

    fn into_roots(mut self) -> Vec<CategoryResponseDto> {
        let roots = std::mem::take(&mut self.roots);
        roots
            .into_iter()
            .filter_map(|slot| self.take_subtree(slot))
            .collect()
    }

    fn into_subtree(mut self, id: Uuid) -> Option<CategoryResponseDto> {
        let slot = *self.by_id.get(&id)?;
        self.take_subtree(slot)
    }
}

/// Read side of the category hierarchy.
///
/// Every view is built from three queries (matching rows, parent links of all rows
/// and per-category article counts), never one query per node.
#[derive(Clone)]
pub struct CategoryTreeService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryTreeService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    async fn load(&self, filter: CategoryFilter) -> Result<CategoryForest> {
        let (categories, links, counts) = tokio::try_join!(
            self.store.list_categories(filter),
            self.store.parent_links(),
            self.store.article_counts(),
        )?;

        let index = ParentIndex::new(links);
        Ok(CategoryForest::assemble(categories, &index, &counts))
    }

    /// Matching categories without children, in listing order
    pub async fn list_flat(&self, filter: CategoryFilter) -> Result<Vec<CategoryResponseDto>> {
        let forest = self.load(filter).await?;
        Ok(forest.nodes.into_iter().flatten().collect())
    }

    /// Matching root categories with their matching descendants nested
    pub async fn list_tree(&self, filter: CategoryFilter) -> Result<Vec<CategoryResponseDto>> {
        Ok(self.load(filter).await?.into_roots())
    }

    /// Soft-deleted categories, most recently deleted first
    pub async fn list_trash(&self) -> Result<Vec<CategoryResponseDto>> {
        self.list_flat(CategoryFilter::trash()).await
    }

    /// A non-deleted category with its non-deleted subtree
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let forest = self.load(CategoryFilter::live()).await?;
        forest
            .into_subtree(id)
            .ok_or_else(|| CategoryError::not_found(id).into())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let forest = self.load(CategoryFilter::live()).await?;
        let id = forest
            .nodes
            .iter()
            .flatten()
            .find(|node| node.slug == slug)
            .map(|node| node.id);

        id.and_then(|id| forest.into_subtree(id)).ok_or_else(|| {
            CategoryError::NotFound(format!("Category with slug '{}' not found", slug)).into()
        })
    }
}
