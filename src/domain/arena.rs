use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::PageRecord;
use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based page hierarchy.
#[derive(Debug)]
pub struct PageNode {
    pub page: PageRecord,
    /// Index of parent node in the arena, None for top-level pages
    pub parent: Option<Index>,
    /// Indices of child nodes, in source order
    pub children: Vec<Index>,
}

/// Arena-based page hierarchy.
///
/// Holds any number of top-level pages. Child counts on each
/// [`PageRecord`] are kept in sync as nodes are inserted.
#[derive(Debug, Default)]
pub struct PageArena {
    arena: Arena<PageNode>,
    roots: Vec<Index>,
    by_id: HashMap<u64, Index>,
}

impl PageArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy from flat records linked by `parent_id` (0 = top level).
    ///
    /// Siblings keep the order in which they appear in `records`.
    #[instrument(level = "debug", skip(records), fields(count = records.len()))]
    pub fn from_records(records: Vec<PageRecord>) -> DomainResult<Self> {
        let mut ids = HashSet::with_capacity(records.len());
        for record in &records {
            if !ids.insert(record.id) {
                return Err(DomainError::DuplicatePage(record.id));
            }
        }
        for record in &records {
            if record.parent_id != 0 && !ids.contains(&record.parent_id) {
                return Err(DomainError::OrphanPage {
                    id: record.id,
                    parent: record.parent_id,
                });
            }
        }

        let parents: HashMap<u64, u64> = records.iter().map(|r| (r.id, r.parent_id)).collect();
        for record in &records {
            let mut steps = 0;
            let mut current = record.parent_id;
            while current != 0 {
                steps += 1;
                if current == record.id || steps > records.len() {
                    return Err(DomainError::CycleDetected(record.id));
                }
                current = parents.get(&current).copied().unwrap_or(0);
            }
        }

        let mut pending: HashMap<u64, Vec<PageRecord>> = HashMap::new();
        let mut top_level = Vec::new();
        for record in records {
            if record.parent_id == 0 {
                top_level.push(record);
            } else {
                pending.entry(record.parent_id).or_default().push(record);
            }
        }

        let mut tree = Self::new();
        let mut queue: Vec<(PageRecord, Option<Index>)> =
            top_level.into_iter().rev().map(|r| (r, None)).collect();
        while let Some((record, parent)) = queue.pop() {
            let id = record.id;
            let idx = tree.insert_page(record, parent);
            if let Some(children) = pending.remove(&id) {
                for child in children.into_iter().rev() {
                    queue.push((child, Some(idx)));
                }
            }
        }
        Ok(tree)
    }

    #[instrument(level = "trace", skip(self, page), fields(id = page.id))]
    pub fn insert_page(&mut self, page: PageRecord, parent: Option<Index>) -> Index {
        let id = page.id;
        let archived = page.archived;
        let node = PageNode {
            page,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.by_id.insert(id, node_idx);

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => {
                parent.children.push(node_idx);
                parent.page.num_historical_children += 1;
                if !archived {
                    parent.page.num_children += 1;
                }
            }
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&PageNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, id: u64) -> Option<Index> {
        self.by_id.get(&id).copied()
    }

    pub fn page(&self, id: u64) -> Option<&PageRecord> {
        self.find(id)
            .and_then(|idx| self.arena.get(idx))
            .map(|n| &n.page)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Apply `f` to every page record (e.g. to attach type information).
    pub fn annotate<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut PageRecord),
    {
        for (_, node) in self.arena.iter_mut() {
            f(&mut node.page);
        }
    }

    /// Pre-order traversal over all top-level trees.
    pub fn iter(&self) -> PageIterator<'_> {
        PageIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct PageIterator<'a> {
    arena: &'a PageArena,
    stack: Vec<Index>,
}

impl<'a> PageIterator<'a> {
    fn new(arena: &'a PageArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PageIterator<'a> {
    type Item = (Index, &'a PageNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}
