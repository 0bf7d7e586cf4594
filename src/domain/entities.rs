//! Domain entities: core data structures

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::html::html_id;

/// Child count strategy counting live children only.
pub const NUM_CHILDREN: &str = "numChildren";
/// Child count strategy counting live and archived children.
pub const NUM_HISTORICAL_CHILDREN: &str = "numHistoricalChildren";

/// Metadata attached to a status flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFlag {
    /// Short label shown next to the node
    pub text: String,
    /// Optional longer description (tooltip)
    pub title: Option<String>,
}

impl StatusFlag {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
        }
    }

    /// Built-in flag for a well-known flag key; unknown keys are labelled with the key.
    pub fn for_key(key: &str) -> Self {
        let (text, title) = match key {
            "modified" => ("Modified", Some("Page has unpublished changes")),
            "addedtodraft" => ("Draft", Some("Page has not been published")),
            "archived" => ("Archived", Some("Page is removed from draft and live")),
            "removedfromdraft" => ("Removed from draft", Some("Page is live only")),
            other => (other, None),
        };
        Self {
            text: text.to_string(),
            title: title.map(str::to_string),
        }
    }
}

/// Status flags keyed by flag identifier, in the entity's natural order.
pub type StatusFlags = IndexMap<String, StatusFlag>;

/// Classification contributed by a search filter for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterClasses {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl FilterClasses {
    /// Collapse into one space-joined token string.
    ///
    /// Returns `None` when the filter has nothing to contribute
    /// (no classes, an empty string or an empty list).
    pub fn into_tokens(self) -> Option<String> {
        match self {
            FilterClasses::None => None,
            FilterClasses::Single(s) if s.is_empty() => None,
            FilterClasses::Single(s) => Some(s),
            FilterClasses::Multiple(v) if v.is_empty() => None,
            FilterClasses::Multiple(v) => Some(v.join(" ")),
        }
    }
}

impl From<&str> for FilterClasses {
    fn from(s: &str) -> Self {
        FilterClasses::Single(s.to_string())
    }
}

impl From<String> for FilterClasses {
    fn from(s: String) -> Self {
        FilterClasses::Single(s)
    }
}

impl From<Vec<String>> for FilterClasses {
    fn from(v: Vec<String>) -> Self {
        FilterClasses::Multiple(v)
    }
}

impl From<Vec<&str>> for FilterClasses {
    fn from(v: Vec<&str>) -> Self {
        FilterClasses::Multiple(v.into_iter().map(str::to_string).collect())
    }
}

/// A content entity that can be shown as a node in the admin tree.
pub trait TreeEntity {
    fn id(&self) -> u64;

    /// Concrete type name, e.g. `Page` or `App\Pages\Article`.
    fn type_name(&self) -> &str;

    /// Human-readable type name.
    fn singular_name(&self) -> String;

    fn title(&self) -> &str;

    /// Text shown inside the node; defaults to the title.
    fn tree_title(&self) -> String {
        self.title().to_string()
    }

    /// Structural classifier: space-separated tokens for type and expansion state.
    ///
    /// `num_children_method` selects the child count strategy. Entities reject
    /// strategies they do not understand.
    fn tree_classes(&self, num_children_method: &str) -> DomainResult<String>;

    /// Status flags, or `None` if the entity has no status introspection.
    fn status_flags(&self) -> Option<StatusFlags> {
        None
    }

    fn icon_url(&self) -> Option<String> {
        None
    }
}

/// Search filter annotating matching tree nodes with extra classes.
pub trait SearchFilter {
    fn page_classes(&self, entity: &dyn TreeEntity) -> FilterClasses;
}

impl<F> SearchFilter for F
where
    F: Fn(&dyn TreeEntity) -> FilterClasses,
{
    fn page_classes(&self, entity: &dyn TreeEntity) -> FilterClasses {
        self(entity)
    }
}

/// Highlights nodes whose title contains a search term (case-insensitive).
#[derive(Debug, Clone)]
pub struct TitleSearchFilter {
    term: String,
}

impl TitleSearchFilter {
    pub const MATCH_CLASS: &'static str = "filtered-item";

    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_lowercase(),
        }
    }
}

impl SearchFilter for TitleSearchFilter {
    fn page_classes(&self, entity: &dyn TreeEntity) -> FilterClasses {
        if !self.term.is_empty() && entity.title().to_lowercase().contains(&self.term) {
            FilterClasses::from(Self::MATCH_CLASS)
        } else {
            FilterClasses::None
        }
    }
}

fn default_true() -> bool {
    true
}

/// A page in the content tree.
///
/// Fields below `flags` are derived: they are filled in from the page type
/// catalog and from the hierarchy, not read from page data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: u64,
    /// Parent page id, 0 for top-level pages
    #[serde(default)]
    pub parent_id: u64,
    #[serde(rename = "type")]
    pub type_name: String,
    pub title: String,
    #[serde(default)]
    pub menu_title: Option<String>,
    #[serde(default = "default_true")]
    pub show_in_menus: bool,
    #[serde(default)]
    pub has_broken_link: bool,
    /// Removed from draft and live; only visible to historical counts
    #[serde(default)]
    pub archived: bool,
    /// Children have been loaded into the tree
    #[serde(default)]
    pub expanded: bool,
    /// Node is shown opened in the tree
    #[serde(default)]
    pub opened: bool,
    /// Status flag keys, in display order
    #[serde(default)]
    pub flags: Vec<String>,

    #[serde(skip)]
    pub singular_name: Option<String>,
    #[serde(skip, default = "default_true")]
    pub can_have_children: bool,
    #[serde(skip)]
    pub icon_url: Option<String>,
    #[serde(skip)]
    pub num_children: usize,
    #[serde(skip)]
    pub num_historical_children: usize,
}

impl PageRecord {
    pub fn new(id: u64, type_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: 0,
            type_name: type_name.into(),
            title: title.into(),
            menu_title: None,
            show_in_menus: true,
            has_broken_link: false,
            archived: false,
            expanded: false,
            opened: false,
            flags: Vec::new(),
            singular_name: None,
            can_have_children: true,
            icon_url: None,
            num_children: 0,
            num_historical_children: 0,
        }
    }

    /// Bare instance of a type, used to answer per-type questions.
    pub fn prototype(type_name: impl Into<String>) -> Self {
        Self::new(0, type_name, "")
    }

    /// Child count according to the named strategy.
    pub fn count_children(&self, num_children_method: &str) -> DomainResult<usize> {
        match num_children_method {
            NUM_CHILDREN => Ok(self.num_children),
            NUM_HISTORICAL_CHILDREN => Ok(self.num_historical_children),
            other => Err(DomainError::UnknownChildCountMethod(other.to_string())),
        }
    }

    /// Expansion and leaf state tokens, each with a leading space.
    fn marking_classes(&self, num_children_method: &str) -> DomainResult<String> {
        let mut classes = String::new();
        if !self.expanded {
            classes.push_str(" unexpanded");
        }
        if self.count_children(num_children_method)? == 0 {
            classes.push_str(" jstree-leaf closed");
        } else if self.opened {
            classes.push_str(" jstree-open");
        } else {
            classes.push_str(" jstree-closed closed");
        }
        Ok(classes)
    }
}

impl TreeEntity for PageRecord {
    fn id(&self) -> u64 {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn singular_name(&self) -> String {
        self.singular_name
            .clone()
            .unwrap_or_else(|| humanize_type_name(&self.type_name))
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn tree_title(&self) -> String {
        self.menu_title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.title.clone())
    }

    fn tree_classes(&self, num_children_method: &str) -> DomainResult<String> {
        let mut classes = format!("class-{}", html_id(&self.type_name));
        if self.has_broken_link {
            classes.push_str(" BrokenLink");
        }
        if !self.can_have_children {
            classes.push_str(" nochildren");
        }
        if !self.show_in_menus {
            classes.push_str(" notinmenu");
        }
        classes.push_str(&self.marking_classes(num_children_method)?);
        Ok(classes)
    }

    fn status_flags(&self) -> Option<StatusFlags> {
        Some(
            self.flags
                .iter()
                .map(|key| (key.clone(), StatusFlag::for_key(key)))
                .collect(),
        )
    }

    fn icon_url(&self) -> Option<String> {
        self.icon_url.clone()
    }
}

/// Derive a readable name from a type name: last namespace segment, words split.
///
/// # Examples
/// ```
/// use cmstree::domain::humanize_type_name;
///
/// assert_eq!(humanize_type_name("RedirectorPage"), "Redirector Page");
/// assert_eq!(humanize_type_name("App\\Pages\\Article"), "Article");
/// ```
pub fn humanize_type_name(type_name: &str) -> String {
    let short = type_name.rsplit('\\').next().unwrap_or(type_name);
    let mut out = String::with_capacity(short.len() + 4);
    let mut prev: Option<char> = None;
    for c in short.chars() {
        if c == '_' {
            out.push(' ');
            prev = Some(' ');
            continue;
        }
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
