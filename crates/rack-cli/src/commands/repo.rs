//! Catalog repository commands

use std::path::Path;

use colored::Colorize;
use rack_core::RepoManager;

use crate::commands::describe_status;
use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Mirror an additional rackspec repository.
pub fn run_repo_add(ctx: &AppContext, name: &str, url: &str) -> Result<()> {
    println!("{} Adding repository {}...", "=>".blue().bold(), name.cyan());

    let git = ctx.git_client();
    RepoManager::new(&ctx.layout, &git).add(name, url)?;

    println!("{} Repository {} added.", "OK".green().bold(), name.cyan());
    Ok(())
}

pub fn run_repo_remove(ctx: &AppContext, name: &str) -> Result<()> {
    let git = ctx.git_client();
    RepoManager::new(&ctx.layout, &git).remove(name)?;

    println!("{} Repository {} removed.", "OK".green().bold(), name.cyan());
    Ok(())
}

pub fn run_repo_list(ctx: &AppContext) -> Result<()> {
    let git = ctx.git_client();
    let repos = RepoManager::new(&ctx.layout, &git).list()?;

    if repos.is_empty() {
        println!("No repositories mirrored.");
        println!("Run {} first.", "rackjobber setup".cyan());
        return Ok(());
    }

    println!("{}", "Repositories".bold());
    for (name, url) in &repos {
        println!("  {:<16} {}", name.green(), url.dimmed());
    }
    Ok(())
}

/// Pull every mirror. Fails when any mirror could not be updated.
pub fn run_repo_update(ctx: &AppContext) -> Result<()> {
    println!("{} Updating repositories...", "=>".blue().bold());

    let git = ctx.git_client();
    let results = RepoManager::new(&ctx.layout, &git).update_all()?;

    let mut failed = 0;
    for (name, result) in &results {
        match result {
            Ok(status) => println!("   {} {}: {}", "+".green(), name, describe_status(status)),
            Err(e) => {
                failed += 1;
                println!("   {} {}: {}", "!".red(), name, e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::user(format!(
            "{} of {} repositories failed to update",
            failed,
            results.len()
        )));
    }
    println!("{} {} repositories up to date.", "OK".green().bold(), results.len());
    Ok(())
}

/// Publish the rackspec of the plugin in `dir` to mirror `repo`.
pub fn run_repo_push(ctx: &AppContext, repo: &str, dir: &Path) -> Result<()> {
    println!(
        "{} Publishing {} to {}...",
        "=>".blue().bold(),
        dir.display(),
        repo.cyan()
    );

    let git = ctx.git_client();
    let spec = RepoManager::new(&ctx.layout, &git).push_spec(repo, dir)?;

    println!(
        "{} Published {} {} to {}.",
        "OK".green().bold(),
        spec.name.cyan(),
        spec.version,
        repo
    );
    Ok(())
}
