//! The setup command

use colored::Colorize;
use rack_core::RepoManager;

use crate::commands::describe_status;
use crate::context::AppContext;
use crate::error::Result;

/// Create the resource folder and mirror the master catalog.
pub fn run_setup(ctx: &AppContext) -> Result<()> {
    println!(
        "{} Setting up {}",
        "=>".blue().bold(),
        ctx.layout.root().display()
    );

    let git = ctx.git_client();
    let status = RepoManager::new(&ctx.layout, &git).setup()?;

    println!(
        "{} Master catalog {}.",
        "OK".green().bold(),
        describe_status(&status)
    );
    Ok(())
}
