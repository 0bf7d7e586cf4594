//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{TreeRenderOptions, PAGE_ICONS_CACHE_REGION};
use crate::application::{IoResultExt, PageAssets};
use crate::cli::args::{CacheCommands, Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::catalog::ICON_CLASS;
use crate::domain::{
    PageTypeCatalog, SearchFilter, TitleSearchFilter, NUM_CHILDREN, NUM_HISTORICAL_CHILDREN,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::CatalogRegistry;

/// Run the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(project_dir.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Css { types, fresh, head }) => css(&container, types, *fresh, *head),
        Some(Commands::Tree {
            types,
            pages,
            current,
            search,
            num_children_method,
        }) => tree(
            &container,
            types,
            pages,
            *current,
            search.as_deref(),
            num_children_method.as_deref(),
        ),
        Some(Commands::Types { types }) => show_types(&container, types),
        Some(Commands::Cache { command }) => match command {
            CacheCommands::Flush { types } => cache_flush(&container, types.as_deref()),
            CacheCommands::Path { types } => cache_path(&container, types.as_deref()),
        },
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => config_show(&container),
            ConfigCommands::Path => config_path(project_dir.as_deref()),
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "cmstree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn css(container: &ServiceContainer, types: &Path, fresh: bool, head: bool) -> CliResult<()> {
    let registry = container.load_registry(types)?;
    let service = container.icons_service(registry);
    if fresh {
        service.flush()?;
    }
    if head {
        let mut assets = PageAssets::new();
        service.init(&mut assets)?;
        output::info(&assets.render_head());
    } else {
        output::info(&service.generate_page_icons_css()?);
    }
    Ok(())
}

#[instrument(skip(container))]
fn tree(
    container: &ServiceContainer,
    types: &Path,
    pages: &Path,
    current: Option<u64>,
    search: Option<&str>,
    num_children_method: Option<&str>,
) -> CliResult<()> {
    let num_children_method =
        num_children_method.unwrap_or(container.settings.num_children_method.as_str());
    if ![NUM_CHILDREN, NUM_HISTORICAL_CHILDREN].contains(&num_children_method) {
        return Err(CliError::InvalidArgs(format!(
            "--num-children-method must be {} or {}, got {}",
            NUM_CHILDREN, NUM_HISTORICAL_CHILDREN, num_children_method
        )));
    }

    let registry = container.load_registry(types)?;
    let pages = container.load_pages(pages, &registry)?;
    if let Some(id) = current {
        if pages.page(id).is_none() {
            output::warning(&format!("current page {} not found", id));
        }
    }

    let filter = search.map(TitleSearchFilter::new);
    let options = TreeRenderOptions {
        current,
        filter: filter.as_ref().map(|f| f as &dyn SearchFilter),
        num_children_method: num_children_method.to_string(),
        edit_link: Some(container.settings.edit_link.clone()),
    };
    let markup = container.tree_service().render(&pages, &options)?;
    output::info(&markup);
    Ok(())
}

fn show_types(container: &ServiceContainer, types: &Path) -> CliResult<()> {
    let registry = container.load_registry(types)?;
    let catalog = registry.catalog();
    let trees: Vec<Tree<String>> = catalog
        .roots()
        .map(|root| type_tree(&registry, catalog, &root.name))
        .collect();
    if trees.is_empty() {
        output::warning("no page types declared");
    }
    for t in trees {
        output::info(&t);
    }
    Ok(())
}

fn type_tree(registry: &CatalogRegistry, catalog: &PageTypeCatalog, name: &str) -> Tree<String> {
    let mut label = name.to_string();
    if let Some(icon_class) = catalog.uninherited(name, ICON_CLASS) {
        label.push_str(&format!(" [icon_class: {}]", icon_class));
    } else if let Some(url) = registry.icon_url(name) {
        label.push_str(&format!(" ({})", url));
    }
    let leaves: Vec<_> = catalog
        .children_of(name)
        .iter()
        .map(|child| type_tree(registry, catalog, child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

fn cache_flush(container: &ServiceContainer, types: Option<&Path>) -> CliResult<()> {
    match types {
        Some(types) => {
            let registry = container.load_registry(types)?;
            let region = container.icon_region_name(&registry);
            container.icons_service(registry).flush()?;
            output::success(&format!("flushed {}", region));
        }
        None => {
            container
                .cache
                .clear_all()
                .with_cache_context("clear", PAGE_ICONS_CACHE_REGION, "*")?;
            output::success("flushed all icon stylesheets");
        }
    }
    Ok(())
}

fn cache_path(container: &ServiceContainer, types: Option<&Path>) -> CliResult<()> {
    let region = match types {
        Some(types) => Some(container.icon_region_name(&*container.load_registry(types)?)),
        None => None,
    };
    match container.cache.location(region.as_deref()) {
        Some(path) => output::action("Cache", &path.display()),
        None => output::action("Cache", "in memory (not persisted)"),
    }
    Ok(())
}

fn config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn config_path(project_dir: Option<&Path>) -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::action("Global", &path.display()),
        None => output::warning("no global config location on this platform"),
    }
    if let Some(dir) = project_dir {
        output::action("Local", &local_config_path(dir).display());
    }
    Ok(())
}
