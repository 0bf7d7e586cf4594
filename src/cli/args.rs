//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Admin tree node markup and page type icon stylesheets
#[derive(Parser, Debug)]
#[command(name = "cmstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding `.cmstree.toml` (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the page type icon stylesheet
    Css {
        /// Page type catalog (TOML)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        types: PathBuf,
        /// Flush the cached stylesheet first
        #[arg(long)]
        fresh: bool,
        /// Wrap the stylesheet in page <style> markup
        #[arg(long)]
        head: bool,
    },

    /// Render page tree markup
    Tree {
        /// Page type catalog (TOML)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        types: PathBuf,
        /// Pages (TOML `[[pages]]`)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        pages: PathBuf,
        /// Id of the currently selected page
        #[arg(long)]
        current: Option<u64>,
        /// Highlight pages whose title contains this term
        #[arg(short, long)]
        search: Option<String>,
        /// Child count strategy (default from settings)
        #[arg(long)]
        num_children_method: Option<String>,
    },

    /// Show the page type hierarchy
    Types {
        /// Page type catalog (TOML)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        types: PathBuf,
    },

    /// Manage the stylesheet cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Drop cached icon stylesheets (all catalogs unless --types is given)
    Flush {
        /// Only the stylesheet of this page type catalog (TOML)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        types: Option<PathBuf>,
    },
    /// Show where the cache lives
    Path {
        /// Show the region of this page type catalog (TOML)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        types: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
