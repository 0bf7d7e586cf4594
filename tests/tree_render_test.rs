//! End-to-end tree markup rendering from TOML page data

use std::path::PathBuf;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use cmstree::application::services::TreeRenderOptions;
use cmstree::application::ApplicationError;
use cmstree::config::{CacheBackend, Settings};
use cmstree::domain::{DomainError, SearchFilter, TitleSearchFilter, NUM_HISTORICAL_CHILDREN};
use cmstree::infrastructure::di::ServiceContainer;
use cmstree::infrastructure::traits::{FallbackTranslator, RealFileSystem};
use cmstree::infrastructure::{CatalogTranslator, InfraError, MemoryCacheStore};
use cmstree::util::testing;

const TYPES: &str = r#"
[[types]]
name = "SiteTree"
icon = "/icons/site.svg"

[[types]]
name = "Page"
parent = "SiteTree"

[[types]]
name = "VirtualPage"
parent = "Page"
singular_name = "Virtual Page"
can_have_children = false

[[types]]
name = "RedirectorPage"
parent = "SiteTree"
"#;

const PAGES: &str = r#"
[[pages]]
id = 1
type = "Page"
title = "Home"
expanded = true
opened = true
flags = ["modified"]

[[pages]]
id = 2
parent_id = 1
type = "Page"
title = "About us"

[[pages]]
id = 3
parent_id = 1
type = "RedirectorPage"
title = "Old news"
archived = true

[[pages]]
id = 4
type = "VirtualPage"
title = "Contact"
show_in_menus = false
"#;

struct Fixture {
    _temp: TempDir,
    types: PathBuf,
    pages: PathBuf,
    container: ServiceContainer,
}

fn write_fixture(pages: &str) -> Fixture {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let types_path = temp.path().join("types.toml");
    let pages_path = temp.path().join("pages.toml");
    std::fs::write(&types_path, TYPES).unwrap();
    std::fs::write(&pages_path, pages).unwrap();

    let settings = Settings {
        cache_backend: CacheBackend::Memory,
        cache_dir: temp.path().join("cache"),
        ..Settings::default()
    };
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(MemoryCacheStore::new()),
        Arc::new(FallbackTranslator),
    );
    Fixture {
        _temp: temp,
        types: types_path,
        pages: pages_path,
        container,
    }
}

#[fixture]
fn site() -> Fixture {
    write_fixture(PAGES)
}

fn render(site: &Fixture, options: &TreeRenderOptions<'_>) -> String {
    let registry = site.container.load_registry(&site.types).unwrap();
    let pages = site.container.load_pages(&site.pages, &registry).unwrap();
    site.container.tree_service().render(&pages, options).unwrap()
}

fn li_for(markup: &str, id: u64) -> &str {
    let start = markup
        .find(&format!("<li id=\"record-{}\"", id))
        .unwrap_or_else(|| panic!("record {} not rendered", id));
    let rest = &markup[start..];
    &rest[..rest.find('>').unwrap() + 1]
}

#[rstest]
fn given_pages_when_rendering_then_nested_lists_in_source_order(site: Fixture) {
    let markup = render(&site, &TreeRenderOptions::default());

    assert!(markup.starts_with("<ul><li id=\"record-1\""));
    let home = markup.find("record-1").unwrap();
    let about = markup.find("record-2").unwrap();
    let contact = markup.find("record-4").unwrap();
    assert!(home < about && about < contact);
    // About is nested inside Home's list item
    assert!(markup.contains("<span class=\"text\">Home</span></a><ul><li id=\"record-2\""));
    assert!(markup.ends_with("</li></ul>"));
}

#[rstest]
fn given_pages_when_rendering_then_classes_reflect_structure_and_status(site: Fixture) {
    let markup = render(&site, &TreeRenderOptions::default());

    assert!(li_for(&markup, 1).contains("class=\"class-Page jstree-open status-modified\""));
    assert!(li_for(&markup, 2).contains("class=\"class-Page unexpanded jstree-leaf closed\""));
    assert!(li_for(&markup, 4).contains(
        "class=\"class-VirtualPage nochildren notinmenu unexpanded jstree-leaf closed\""
    ));
}

#[rstest]
fn given_current_page_when_rendering_then_only_that_node_is_current(site: Fixture) {
    let options = TreeRenderOptions {
        current: Some(2),
        ..Default::default()
    };

    let markup = render(&site, &options);

    assert!(li_for(&markup, 2).contains("class=\"class-Page unexpanded jstree-leaf closed current\""));
    assert!(!li_for(&markup, 1).contains("current"));
    assert!(!li_for(&markup, 4).contains("current"));
}

#[rstest]
fn given_search_filter_when_rendering_then_matches_are_marked(site: Fixture) {
    let filter = TitleSearchFilter::new("about");
    let options = TreeRenderOptions {
        filter: Some(&filter as &dyn SearchFilter),
        ..Default::default()
    };

    let markup = render(&site, &options);

    assert!(li_for(&markup, 2).contains("closed filtered-item\""));
    assert!(!li_for(&markup, 1).contains("filtered-item"));
}

#[rstest]
fn given_live_child_count_when_rendering_then_archived_pages_hidden(site: Fixture) {
    let markup = render(&site, &TreeRenderOptions::default());

    assert!(!markup.contains("record-3"));
}

#[rstest]
fn given_historical_child_count_when_rendering_then_archived_pages_shown(site: Fixture) {
    let options = TreeRenderOptions {
        num_children_method: NUM_HISTORICAL_CHILDREN.to_string(),
        ..Default::default()
    };

    let markup = render(&site, &options);

    assert!(li_for(&markup, 3)
        .contains("class=\"class-RedirectorPage unexpanded jstree-leaf closed\""));
}

#[rstest]
fn given_unknown_child_count_method_when_rendering_then_domain_error(site: Fixture) {
    let registry = site.container.load_registry(&site.types).unwrap();
    let pages = site.container.load_pages(&site.pages, &registry).unwrap();
    let options = TreeRenderOptions {
        num_children_method: "numGrandChildren".to_string(),
        ..Default::default()
    };

    let result = site.container.tree_service().render(&pages, &options);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UnknownChildCountMethod(_)))
    ));
}

#[rstest]
fn given_edit_link_when_rendering_then_anchor_carries_page_link(site: Fixture) {
    let options = TreeRenderOptions {
        edit_link: Some(site.container.settings.edit_link.clone()),
        ..Default::default()
    };

    let markup = render(&site, &options);

    assert!(markup.contains("<a href=\"admin/pages/edit/show/2\" title=\"(Page type: Page) About us\">"));
    assert!(markup.contains("title=\"(Page type: Virtual Page) Contact\""));
}

#[rstest]
fn given_translated_label_when_rendering_then_title_uses_translation() {
    let mut site = write_fixture(PAGES);
    let translator = CatalogTranslator::new(
        [("LeftAndMain.PAGETYPE".to_string(), "Seitentyp:".to_string())]
            .into_iter()
            .collect(),
    );
    site.container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(RealFileSystem),
        Arc::new(MemoryCacheStore::new()),
        Arc::new(translator),
    );

    let markup = render(&site, &TreeRenderOptions::default());

    assert!(markup.contains("title=\"(Seitentyp: Page) Home\""));
}

#[rstest]
fn given_no_pages_when_rendering_then_empty_markup() {
    let site = write_fixture("");

    assert_eq!(render(&site, &TreeRenderOptions::default()), "");
}

#[rstest]
fn given_orphan_page_when_loading_then_domain_error() {
    let site = write_fixture(
        r#"
[[pages]]
id = 5
parent_id = 99
type = "Page"
title = "Lost"
"#,
    );
    let registry = site.container.load_registry(&site.types).unwrap();

    let result = site.container.load_pages(&site.pages, &registry);

    assert!(matches!(
        result,
        Err(InfraError::Application(ApplicationError::Domain(
            DomainError::OrphanPage { id: 5, parent: 99 }
        )))
    ));
}

#[rstest]
fn given_missing_pages_file_when_loading_then_io_error(site: Fixture) {
    let registry = site.container.load_registry(&site.types).unwrap();

    let result = site
        .container
        .load_pages(&site.types.with_file_name("missing.toml"), &registry);

    assert!(matches!(result, Err(InfraError::Io { .. })));
}
