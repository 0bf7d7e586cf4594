//! View wrapper around entities displayed in the admin tree.

use tracing::trace;

use crate::domain::{escape_html, DomainResult, SearchFilter, TreeEntity, NUM_CHILDREN};
use crate::infrastructure::traits::Translator;

/// Translation key of the "Page type" label in node titles.
pub const PAGE_TYPE_KEY: &str = "LeftAndMain.PAGETYPE";
pub const PAGE_TYPE_FALLBACK: &str = "Page type";

/// Values handed to the node template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub id: u64,
    pub type_name: String,
    pub classes: String,
    pub link: Option<String>,
    pub title: String,
    pub tree_title: String,
}

impl RenderRequest {
    /// Opening markup of the node: the `<li>` and its anchor, `<li>` left open.
    pub fn to_open_markup(&self) -> String {
        let href = self
            .link
            .as_deref()
            .map(|l| format!(" href=\"{}\"", escape_html(l)))
            .unwrap_or_default();
        format!(
            "<li id=\"record-{id}\" data-id=\"{id}\" data-pagetype=\"{ty}\" class=\"{classes}\">\
             <ins class=\"jstree-icon\">&nbsp;</ins>\
             <a{href} title=\"{title}\"><ins class=\"jstree-icon\">&nbsp;</ins>\
             <span class=\"text\">{text}</span></a>",
            id = self.id,
            ty = escape_html(&self.type_name),
            classes = escape_html(&self.classes),
            href = href,
            title = escape_html(&self.title),
            text = escape_html(&self.tree_title),
        )
    }
}

/// Presentation state for one tree node.
///
/// The entity is borrowed for the duration of a render pass. A view may be
/// reused across nodes through its setters.
pub struct TreeNodeView<'a> {
    obj: &'a dyn TreeEntity,
    link: Option<String>,
    is_current: bool,
    num_children_method: String,
    filter: Option<&'a dyn SearchFilter>,
}

impl<'a> TreeNodeView<'a> {
    pub fn new(obj: &'a dyn TreeEntity) -> Self {
        Self {
            obj,
            link: None,
            is_current: false,
            num_children_method: NUM_CHILDREN.to_string(),
            filter: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_current(mut self, is_current: bool) -> Self {
        self.is_current = is_current;
        self
    }

    pub fn with_num_children_method(mut self, method: impl Into<String>) -> Self {
        self.num_children_method = method.into();
        self
    }

    pub fn with_filter(mut self, filter: &'a dyn SearchFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn obj(&self) -> &'a dyn TreeEntity {
        self.obj
    }

    pub fn set_obj(&mut self, obj: &'a dyn TreeEntity) -> &mut Self {
        self.obj = obj;
        self
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn set_link(&mut self, link: Option<String>) -> &mut Self {
        self.link = link;
        self
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn set_is_current(&mut self, is_current: bool) -> &mut Self {
        self.is_current = is_current;
        self
    }

    pub fn num_children_method(&self) -> &str {
        &self.num_children_method
    }

    /// CSS classes for this node.
    ///
    /// Order: structural classes, `current`, one `status-<flag>` per status
    /// flag, then the filter's classes.
    pub fn classes(&self) -> DomainResult<String> {
        let mut classes = self.obj.tree_classes(&self.num_children_method)?;
        if self.is_current {
            classes.push_str(" current");
        }
        if let Some(flags) = self.obj.status_flags() {
            for key in flags.keys() {
                classes.push_str(" status-");
                classes.push_str(key);
            }
        }
        if let Some(filter) = self.filter {
            if let Some(tokens) = filter.page_classes(self.obj).into_tokens() {
                classes.push(' ');
                classes.push_str(&tokens);
            }
        }
        trace!(id = self.obj.id(), %classes, "node classes");
        Ok(classes)
    }

    /// Tooltip title: `(<Page type>: <type name>) <title>`.
    pub fn title(&self, translator: &dyn Translator) -> String {
        let label = translator.translate(PAGE_TYPE_KEY, PAGE_TYPE_FALLBACK);
        format!(
            "({}: {}) {}",
            label.trim_matches(|c| c == ' ' || c == ':'),
            self.obj.singular_name(),
            self.obj.title()
        )
    }

    pub fn for_template(&self, translator: &dyn Translator) -> DomainResult<RenderRequest> {
        Ok(RenderRequest {
            id: self.obj.id(),
            type_name: self.obj.type_name().to_string(),
            classes: self.classes()?,
            link: self.link.clone(),
            title: self.title(translator),
            tree_title: self.obj.tree_title(),
        })
    }

    /// Opening markup; children go between this and [`Self::render_close`].
    pub fn render_open(&self, translator: &dyn Translator) -> DomainResult<String> {
        Ok(self.for_template(translator)?.to_open_markup())
    }

    pub fn render_close(&self) -> &'static str {
        "</li>"
    }

    /// Complete node with the given children markup inside.
    pub fn render(&self, translator: &dyn Translator, children: &str) -> DomainResult<String> {
        let mut out = self.render_open(translator)?;
        out.push_str(children);
        out.push_str(self.render_close());
        Ok(out)
    }
}
