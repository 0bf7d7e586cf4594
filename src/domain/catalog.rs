//! Page type catalog: the content type hierarchy and per-type configuration.
//!
//! Each type declares its own configuration values. Lookups either read
//! only the type's own declaration ([`PageTypeCatalog::uninherited`]) or walk
//! the ancestor chain ([`PageTypeCatalog::inherited`]).

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Config key: icon resource for the type.
pub const ICON: &str = "icon";
/// Config key: CSS class replacing the generated icon rule.
pub const ICON_CLASS: &str = "icon_class";
/// Config key: human-readable type name.
pub const SINGULAR_NAME: &str = "singular_name";
/// Config key: whether pages of this type may have children.
pub const CAN_HAVE_CHILDREN: &str = "can_have_children";

/// Declaration of one page type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTypeDef {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub singular_name: Option<String>,
    #[serde(default)]
    pub can_have_children: Option<bool>,
}

impl PageTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            icon: None,
            icon_class: None,
            singular_name: None,
            can_have_children: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_icon_class(mut self, icon_class: impl Into<String>) -> Self {
        self.icon_class = Some(icon_class.into());
        self
    }

    /// Value declared on this type for `key`, if any.
    pub fn own_config(&self, key: &str) -> Option<String> {
        match key {
            ICON => self.icon.clone(),
            ICON_CLASS => self.icon_class.clone(),
            SINGULAR_NAME => self.singular_name.clone(),
            CAN_HAVE_CHILDREN => self.can_have_children.map(|b| b.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<PageTypeDef>,
}

/// Validated type hierarchy, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PageTypeCatalog {
    types: IndexMap<String, PageTypeDef>,
    children: HashMap<String, Vec<String>>,
}

impl PageTypeCatalog {
    /// Parse a TOML catalog (`[[types]]` tables).
    pub fn parse(content: &str) -> DomainResult<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| DomainError::InvalidCatalog {
            message: e.to_string(),
        })?;
        Self::from_defs(file.types)
    }

    /// Build a catalog, rejecting duplicates, unknown parents and parent cycles.
    pub fn from_defs(defs: Vec<PageTypeDef>) -> DomainResult<Self> {
        let mut types = IndexMap::with_capacity(defs.len());
        for def in defs {
            if types.contains_key(&def.name) {
                return Err(DomainError::InvalidCatalog {
                    message: format!("duplicate page type: {}", def.name),
                });
            }
            types.insert(def.name.clone(), def);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for def in types.values() {
            if let Some(parent) = &def.parent {
                if !types.contains_key(parent) {
                    return Err(DomainError::InvalidCatalog {
                        message: format!("page type {} has unknown parent {}", def.name, parent),
                    });
                }
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(def.name.clone());
            }
        }

        let catalog = Self { types, children };
        catalog.check_cycles()?;
        Ok(catalog)
    }

    fn check_cycles(&self) -> DomainResult<()> {
        for def in self.types.values() {
            let mut steps = 0;
            let mut current = def.parent.as_deref();
            while let Some(name) = current {
                steps += 1;
                if steps > self.types.len() {
                    return Err(DomainError::InvalidCatalog {
                        message: format!("cycle in parents of page type {}", def.name),
                    });
                }
                current = self.types.get(name).and_then(|d| d.parent.as_deref());
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Type declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PageTypeDef> {
        self.types.values()
    }

    pub fn get(&self, name: &str) -> Option<&PageTypeDef> {
        self.types.get(name)
    }

    /// Types without a parent, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &PageTypeDef> {
        self.types.values().filter(|d| d.parent.is_none())
    }

    /// Direct subtypes, in declaration order.
    pub fn children_of(&self, name: &str) -> &[String] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The type followed by its ancestors, nearest first.
    pub fn ancestry(&self, name: &str) -> DomainResult<Vec<&PageTypeDef>> {
        let mut chain = Vec::new();
        let mut current = Some(name);
        while let Some(n) = current {
            let def = self
                .types
                .get(n)
                .ok_or_else(|| DomainError::UnknownPageType(n.to_string()))?;
            chain.push(def);
            current = def.parent.as_deref();
        }
        Ok(chain)
    }

    /// `base` followed by all of its transitive subtypes, depth-first in declaration order.
    pub fn subclasses_for(&self, base: &str) -> DomainResult<Vec<String>> {
        if !self.contains(base) {
            return Err(DomainError::UnknownPageType(base.to_string()));
        }
        let mut result = Vec::new();
        let mut stack = vec![base.to_string()];
        while let Some(name) = stack.pop() {
            for child in self.children_of(&name).iter().rev() {
                stack.push(child.clone());
            }
            result.push(name);
        }
        Ok(result)
    }

    /// Config value declared on `name` itself, ignoring ancestors.
    pub fn uninherited(&self, name: &str, key: &str) -> Option<String> {
        self.types.get(name).and_then(|d| d.own_config(key))
    }

    /// Config value declared on `name` or the nearest ancestor declaring it.
    pub fn inherited(&self, name: &str, key: &str) -> Option<String> {
        self.ancestry(name)
            .ok()?
            .into_iter()
            .find_map(|d| d.own_config(key))
    }

    pub fn can_have_children(&self, name: &str) -> bool {
        self.inherited(name, CAN_HAVE_CHILDREN)
            .map(|v| v != "false")
            .unwrap_or(true)
    }
}
