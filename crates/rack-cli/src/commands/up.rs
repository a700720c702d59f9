//! The up command: sync shops with their rackfile
//!
//! Catalogs are refreshed once, then each shop is synced on its own thread.
//! Shops share only the read-only catalog and the prompt; per-shop output is
//! printed after that shop finishes so reports never interleave. An accepted
//! remirror is carried out once, after every shop has finished.

use colored::Colorize;
use rack_core::{
    RepoManager, Shop, ShopStore, ShopTarget, SyncOptions, SyncOrchestrator, SyncOutcome,
    SyncReport,
};
use rack_fs::io;
use rack_remote::Timeouts;

use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::interactive::TerminalPrompt;

/// Sync every shop in `names`. Fails when any shop failed.
pub fn run_up(ctx: &AppContext, names: &[String], dry_run: bool) -> Result<()> {
    if !io::exists(&ctx.layout.master_repo_dir())? {
        return Err(CliError::user(
            "No catalog mirrored yet. Run 'rackjobber setup' first.",
        ));
    }

    let store = ShopStore::load(&ctx.layout)?;
    let shops = names
        .iter()
        .map(|name| store.require(name))
        .collect::<rack_core::Result<Vec<&Shop>>>()?;

    let git = ctx.git_client();
    let catalog = ctx.catalog();
    let repos = RepoManager::new(&ctx.layout, &git);
    let prompt = TerminalPrompt::new();
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &git, &prompt, ctx.config.sync_settings());

    println!("{} Refreshing catalogs...", "=>".blue().bold());
    orchestrator.refresh_catalog()?;

    let timeouts = ctx.config.remote_timeouts();
    let options = SyncOptions {
        dry_run,
        defer_remirror: true,
    };

    let results: Vec<(&str, Result<SyncOutcome>)> = if shops.len() == 1 {
        shops
            .iter()
            .map(|shop| (shop.name.as_str(), sync_one(&orchestrator, shop, timeouts, &options)))
            .collect()
    } else {
        std::thread::scope(|scope| {
            let handles: Vec<_> = shops
                .iter()
                .map(|shop| {
                    let orchestrator = &orchestrator;
                    let options = &options;
                    let handle =
                        scope.spawn(move || sync_one(orchestrator, shop, timeouts, options));
                    (shop.name.as_str(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(CliError::user(format!("sync of shop '{}' panicked", name)))
                    });
                    (name, result)
                })
                .collect()
        })
    };

    let mut failed = 0;
    let mut restart = Vec::new();
    for (name, result) in &results {
        match result {
            Ok(SyncOutcome::Completed(report)) => print_report(report),
            Ok(SyncOutcome::RestartRequired { component }) => {
                println!(
                    "{} {}: {} is not in the catalog.",
                    "RESTART".yellow().bold(),
                    name,
                    component.cyan()
                );
                restart.push(*name);
            }
            Err(e) => {
                failed += 1;
                println!("{} {}: {}", "FAILED".red().bold(), name, e);
            }
        }
    }

    // Every worker has joined, so nothing reads the catalog any more.
    if !restart.is_empty() {
        println!("{} Reinstalling the master catalog...", "=>".blue().bold());
        orchestrator.remirror()?;
        let shops: Vec<String> = restart.iter().map(|name| format!("--shop {name}")).collect();
        println!(
            "Run {} again.",
            format!("rackjobber up {}", shops.join(" ")).cyan()
        );
    }

    if failed > 0 {
        return Err(CliError::user(format!(
            "{} of {} shops failed; their ledgers were left unchanged",
            failed,
            results.len()
        )));
    }
    Ok(())
}

fn sync_one(
    orchestrator: &SyncOrchestrator<'_>,
    shop: &Shop,
    timeouts: Timeouts,
    options: &SyncOptions,
) -> Result<SyncOutcome> {
    let transport = shop.transport(timeouts);
    let target = ShopTarget {
        name: &shop.name,
        transport: transport.as_ref(),
        shopware_dir: &shop.shopwaredir,
        container: &shop.container,
    };
    tracing::info!(shop = %shop.name, host = %transport.describe(), "syncing shop");
    Ok(orchestrator.sync_shop(target, options)?)
}

fn print_report(report: &SyncReport) {
    println!(
        "{} Shop {}{}",
        "=>".blue().bold(),
        report.shop.cyan(),
        if report.dry_run { " (dry run)" } else { "" }
    );

    for name in &report.removed {
        println!("   {} {}", "DEL".red(), name);
    }
    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
    for name in &report.up_to_date {
        println!("   {} {} is up to date", "=".dimmed(), name);
    }
    for skipped in &report.skipped {
        println!("   {} {}: {}", "SKIP".yellow(), skipped.name, skipped.reason);
    }

    if report.dry_run {
        println!("{} Dry run, nothing changed.", "OK".green().bold());
    } else if report.is_noop() {
        println!("{} Shop is up to date.", "OK".green().bold());
    } else {
        println!(
            "{} Removed {}, updated {}.",
            "OK".green().bold(),
            report.removed.len(),
            report.updated.len()
        );
    }
}
