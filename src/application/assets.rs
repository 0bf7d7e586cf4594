//! Inline stylesheet registry for a page.

/// One inline stylesheet, optionally registered under an id.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CssBlock {
    id: Option<String>,
    css: String,
}

/// Inline CSS collected while building a page.
///
/// Stylesheets registered under an id replace earlier ones with the same id
/// (keeping their position); anonymous stylesheets are always appended.
#[derive(Debug, Clone, Default)]
pub struct PageAssets {
    styles: Vec<CssBlock>,
}

impl PageAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn custom_css(&mut self, css: impl Into<String>, id: Option<&str>) {
        let css = css.into();
        if let Some(id) = id {
            if let Some(block) = self
                .styles
                .iter_mut()
                .find(|b| b.id.as_deref() == Some(id))
            {
                block.css = css;
                return;
            }
        }
        self.styles.push(CssBlock {
            id: id.map(str::to_string),
            css,
        });
    }

    /// Stylesheet registered under `id`.
    pub fn css(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|b| b.id.as_deref() == Some(id))
            .map(|b| b.css.as_str())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// `<style>` elements in registration order.
    pub fn render_head(&self) -> String {
        self.styles
            .iter()
            .map(|b| format!("<style type=\"text/css\">\n{}\n</style>\n", b.css))
            .collect()
    }
}
