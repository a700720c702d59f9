//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// rackjobber - Keep Shopware shops in line with their rackfile
#[derive(Parser, Debug)]
#[command(name = "rackjobber")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Resource folder holding config, shops, and catalog mirrors
    #[arg(long, global = true, env = "RACKJOBBER_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the resource folder and mirror the master catalog
    Setup,

    /// Manage git accounts used for catalog and plugin repositories
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Manage mirrored rackspec repositories
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },

    /// Manage known shops
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },

    /// Scaffold and publish plugins
    Plugin {
        #[command(subcommand)]
        action: PluginAction,
    },

    /// Print a starter rackfile
    ///
    /// Examples:
    ///   rackjobber rackfile                         # Print to stdout
    ///   rackjobber rackfile -o custom/rackfile.yaml # Write to a file
    Rackfile {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Bring one or more shops in line with their rackfile
    ///
    /// Examples:
    ///   rackjobber up --shop staging
    ///   rackjobber up --shop staging --shop live --dry-run
    Up {
        /// Shop to update (repeatable)
        #[arg(short, long = "shop", alias = "shopName", required = true)]
        shops: Vec<String>,

        /// Show what would change without touching the shop
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   rackjobber completions bash > ~/.local/share/bash-completion/completions/rackjobber
    ///   rackjobber completions zsh > ~/.zfunc/_rackjobber
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Account subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    /// Store credentials for a git host
    Add {
        /// Host name, e.g. github.com
        domain: String,

        /// Account user name
        #[arg(short, long)]
        username: String,

        /// Password or token (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Ask for the password each time instead of storing it
        #[arg(long, conflicts_with = "password")]
        keychain: bool,

        /// Replace an existing account without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Forget the account for a git host
    Remove {
        /// Host name
        domain: String,
    },

    /// List stored accounts
    List,
}

/// Repository subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RepoAction {
    /// Mirror an additional rackspec repository
    Add {
        /// Local name for the mirror
        name: String,

        /// Git URL of the repository
        url: String,
    },

    /// Delete a mirrored repository
    Remove {
        /// Name of the mirror
        name: String,
    },

    /// List mirrored repositories
    List,

    /// Pull every mirror
    Update,

    /// Publish the rackspec of a plugin to a repository
    Push {
        /// Name of the target mirror
        repo: String,

        /// Plugin directory (defaults to the current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Shop subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShopAction {
    /// Register a shop
    Add(ShopAddArgs),

    /// Forget a shop
    Remove {
        /// Shop name
        name: String,
    },

    /// List known shops
    List,
}

/// Arguments for `shop add`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ShopAddArgs {
    /// Read the shop definition from a YAML file
    #[arg(short, long, conflicts_with_all = ["name", "address", "user", "shopware_dir", "container"])]
    pub file: Option<PathBuf>,

    /// Shop name
    #[arg(long, required_unless_present = "file")]
    pub name: Option<String>,

    /// Host address, or "localhost" for this machine
    #[arg(long, required_unless_present = "file")]
    pub address: Option<String>,

    /// SSH user
    #[arg(long, required_unless_present = "file")]
    pub user: Option<String>,

    /// SSH port
    #[arg(long)]
    pub port: Option<u16>,

    /// Shopware installation directory on the host
    #[arg(long, required_unless_present = "file")]
    pub shopware_dir: Option<String>,

    /// Docker container running the shop
    #[arg(long, required_unless_present = "file")]
    pub container: Option<String>,

    /// Register without checking that the host answers
    #[arg(long)]
    pub skip_check: bool,
}

/// Plugin subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PluginAction {
    /// Create a new plugin skeleton in the current directory
    Init(PluginInitArgs),

    /// Write a rackspec for the plugin in a directory
    Integrate {
        /// Plugin directory (defaults to the current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Remove the rackspec from a plugin directory
    Deintegrate {
        /// Plugin directory (defaults to the current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// List plugins available in the catalog
    List {
        /// Only list plugins of this mirror
        #[arg(short, long)]
        repo: Option<String>,
    },
}

/// Arguments for `plugin init`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PluginInitArgs {
    /// Plugin name, e.g. WdyCart
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Initial version
    #[arg(long)]
    pub version: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Lowest supported Shopware version
    #[arg(long)]
    pub min_version: Option<String>,

    /// Highest supported Shopware version
    #[arg(long)]
    pub max_version: Option<String>,

    #[arg(long)]
    pub copyright: Option<String>,

    #[arg(long)]
    pub license: Option<String>,

    #[arg(long)]
    pub link: Option<String>,
}
