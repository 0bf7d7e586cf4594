//! Tree markup assembly
//!
//! Renders a [`PageArena`] as nested lists. Each node is rendered as
//! open tag, child list, close tag through one reused [`TreeNodeView`].

use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, TreeNodeView};
use crate::domain::{
    DomainResult, PageArena, SearchFilter, NUM_CHILDREN, NUM_HISTORICAL_CHILDREN,
};
use crate::infrastructure::traits::Translator;

/// Per-render presentation options.
pub struct TreeRenderOptions<'f> {
    /// Id of the currently selected page
    pub current: Option<u64>,
    pub filter: Option<&'f dyn SearchFilter>,
    pub num_children_method: String,
    /// Link pattern; `{id}` is replaced by the page id
    pub edit_link: Option<String>,
}

impl Default for TreeRenderOptions<'_> {
    fn default() -> Self {
        Self {
            current: None,
            filter: None,
            num_children_method: NUM_CHILDREN.to_string(),
            edit_link: None,
        }
    }
}

impl TreeRenderOptions<'_> {
    fn link_for(&self, id: u64) -> Option<String> {
        self.edit_link
            .as_ref()
            .map(|pattern| pattern.replace("{id}", &id.to_string()))
    }

    /// Archived pages only show up when counting historical children.
    fn shows_archived(&self) -> bool {
        self.num_children_method == NUM_HISTORICAL_CHILDREN
    }
}

/// Service rendering page trees.
pub struct TreeRenderService {
    translator: Arc<dyn Translator>,
}

impl TreeRenderService {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Markup for the whole tree; empty for an empty tree.
    #[instrument(level = "debug", skip_all, fields(pages = tree.len()))]
    pub fn render(
        &self,
        tree: &PageArena,
        options: &TreeRenderOptions<'_>,
    ) -> ApplicationResult<String> {
        let Some(first) = tree.roots().first().and_then(|&idx| tree.get_node(idx)) else {
            debug!("empty tree");
            return Ok(String::new());
        };

        let mut view = TreeNodeView::new(&first.page)
            .with_num_children_method(options.num_children_method.clone());
        if let Some(filter) = options.filter {
            view = view.with_filter(filter);
        }

        let mut out = String::new();
        self.render_list(tree, tree.roots(), &mut view, options, &mut out)?;
        Ok(out)
    }

    fn render_list<'a>(
        &self,
        tree: &'a PageArena,
        nodes: &[Index],
        view: &mut TreeNodeView<'a>,
        options: &TreeRenderOptions<'_>,
        out: &mut String,
    ) -> DomainResult<()> {
        let visible: Vec<_> = nodes
            .iter()
            .filter_map(|&idx| tree.get_node(idx))
            .filter(|node| options.shows_archived() || !node.page.archived)
            .collect();
        if visible.is_empty() {
            return Ok(());
        }

        out.push_str("<ul>");
        for node in visible {
            view.set_obj(&node.page)
                .set_is_current(options.current == Some(node.page.id))
                .set_link(options.link_for(node.page.id));
            out.push_str(&view.render_open(self.translator.as_ref())?);
            self.render_list(tree, &node.children, view, options, out)?;
            out.push_str(view.render_close());
        }
        out.push_str("</ul>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageRecord;
    use crate::infrastructure::traits::FallbackTranslator;

    #[test]
    fn test_link_for_substitutes_id() {
        let options = TreeRenderOptions {
            edit_link: Some("admin/pages/edit/show/{id}".into()),
            ..Default::default()
        };
        assert_eq!(options.link_for(12).as_deref(), Some("admin/pages/edit/show/12"));
        assert_eq!(TreeRenderOptions::default().link_for(12), None);
    }

    #[test]
    fn test_empty_tree_renders_nothing() {
        let service = TreeRenderService::new(Arc::new(FallbackTranslator));
        let out = service
            .render(&PageArena::new(), &TreeRenderOptions::default())
            .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_single_node() {
        let service = TreeRenderService::new(Arc::new(FallbackTranslator));
        let tree = PageArena::from_records(vec![PageRecord::new(1, "Page", "Home")]).unwrap();
        let out = service.render(&tree, &TreeRenderOptions::default()).unwrap();
        assert!(out.starts_with("<ul><li id=\"record-1\""));
        assert!(out.ends_with("</a></li></ul>"));
    }
}
