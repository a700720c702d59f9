//! Plugin scaffolding and catalog listing

use std::path::Path;

use colored::Colorize;
use rack_core::plugin::{self, InitOptions};

use crate::cli::PluginInitArgs;
use crate::context::AppContext;
use crate::error::Result;

/// Create `<parent>/<name>/` with a bootstrap class and `plugin.xml`.
pub fn run_plugin_init(parent: &Path, args: PluginInitArgs) -> Result<()> {
    let options = InitOptions {
        description: args.description,
        version: args.version,
        author: args.author,
        min_version: args.min_version,
        max_version: args.max_version,
        copyright: args.copyright,
        license: args.license,
        link: args.link,
    };
    let dir = plugin::init(parent, &args.name, &options)?;

    println!(
        "{} Created plugin {} in {}",
        "OK".green().bold(),
        args.name.cyan(),
        dir.display()
    );
    println!();
    println!("Next steps:");
    println!("  1. Commit the plugin and push it to its git origin");
    println!("  2. Tag the release, e.g. {}", "git tag 1.0.0".cyan());
    println!("  3. Run {}", "rackjobber plugin integrate".cyan());
    Ok(())
}

/// Write the rackspec for the plugin in `dir`.
pub fn run_plugin_integrate(ctx: &AppContext, dir: &Path) -> Result<()> {
    let git = ctx.git_client();
    let path = plugin::integrate(dir, &git)?;

    println!(
        "{} Created {}",
        "OK".green().bold(),
        path.display().to_string().cyan()
    );
    println!(
        "Run {} to publish it.",
        "rackjobber repo push <repo>".cyan()
    );
    Ok(())
}

pub fn run_plugin_deintegrate(dir: &Path) -> Result<()> {
    let path = plugin::deintegrate(dir)?;
    println!("{} Removed {}", "OK".green().bold(), path.display());
    Ok(())
}

/// Print component names from the mirrored catalogs.
pub fn run_plugin_list(ctx: &AppContext, repo: Option<&str>) -> Result<()> {
    let names = plugin::list(&ctx.catalog(), repo)?;
    if names.is_empty() {
        println!("No plugins found.");
        return Ok(());
    }

    let title = match repo {
        Some(repo) => format!("Plugins in {}", repo),
        None => "Plugins".to_string(),
    };
    println!("{}", title.bold());
    for name in names {
        println!("  {}", name.green());
    }
    Ok(())
}
