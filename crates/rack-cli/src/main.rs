//! rackjobber CLI
//!
//! Keeps Shopware shops in line with the plugins and themes their rackfile
//! declares.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{AccountAction, Cli, Commands, PluginAction, RepoAction, ShopAction};
use context::{AppContext, dir_or_cwd};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.home),
        None => {
            println!(
                "{} Shopware plugin deployment",
                "rackjobber".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "rackjobber --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_ok() {
        tracing::debug!("verbose mode enabled");
    }
}

fn execute_command(cmd: Commands, home: Option<PathBuf>) -> Result<()> {
    let context = || AppContext::load(home.clone());
    match cmd {
        Commands::Setup => commands::run_setup(&context()?),
        Commands::Account { action } => {
            let ctx = context()?;
            match action {
                AccountAction::Add {
                    domain,
                    username,
                    password,
                    keychain,
                    force,
                } => commands::run_account_add(
                    &ctx,
                    &domain,
                    &username,
                    password.as_deref(),
                    keychain,
                    force,
                ),
                AccountAction::Remove { domain } => commands::run_account_remove(&ctx, &domain),
                AccountAction::List => commands::run_account_list(&ctx),
            }
        }
        Commands::Repo { action } => {
            let ctx = context()?;
            match action {
                RepoAction::Add { name, url } => commands::run_repo_add(&ctx, &name, &url),
                RepoAction::Remove { name } => commands::run_repo_remove(&ctx, &name),
                RepoAction::List => commands::run_repo_list(&ctx),
                RepoAction::Update => commands::run_repo_update(&ctx),
                RepoAction::Push { repo, dir } => {
                    commands::run_repo_push(&ctx, &repo, &dir_or_cwd(dir)?)
                }
            }
        }
        Commands::Shop { action } => {
            let ctx = context()?;
            match action {
                ShopAction::Add(args) => commands::run_shop_add(&ctx, args),
                ShopAction::Remove { name } => commands::run_shop_remove(&ctx, &name),
                ShopAction::List => commands::run_shop_list(&ctx),
            }
        }
        Commands::Plugin { action } => match action {
            PluginAction::Init(args) => {
                let cwd = std::env::current_dir()?;
                commands::run_plugin_init(&cwd, args)
            }
            PluginAction::Integrate { dir } => {
                commands::run_plugin_integrate(&context()?, &dir_or_cwd(dir)?)
            }
            PluginAction::Deintegrate { dir } => {
                commands::run_plugin_deintegrate(&dir_or_cwd(dir)?)
            }
            PluginAction::List { repo } => {
                commands::run_plugin_list(&context()?, repo.as_deref())
            }
        },
        Commands::Rackfile { output } => commands::run_rackfile(output.as_deref()),
        Commands::Up { shops, dry_run } => commands::run_up(&context()?, &shops, dry_run),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "rackjobber",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
