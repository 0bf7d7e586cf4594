//! Table-based translations.

use std::collections::BTreeMap;

use crate::infrastructure::traits::Translator;

/// Translator backed by a `key -> text` table (usually from settings).
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    entries: BTreeMap<String, String>,
}

impl CatalogTranslator {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str, fallback: &str) -> String {
        self.entries
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_with_and_without_entry() {
        let mut entries = BTreeMap::new();
        entries.insert("LeftAndMain.PAGETYPE".to_string(), "Seitentyp: ".to_string());
        entries.insert("Empty.KEY".to_string(), String::new());
        let t = CatalogTranslator::new(entries);

        assert_eq!(t.translate("LeftAndMain.PAGETYPE", "Page type"), "Seitentyp: ");
        assert_eq!(t.translate("Missing.KEY", "Fallback"), "Fallback");
        assert_eq!(t.translate("Empty.KEY", "Fallback"), "Fallback");
    }
}
