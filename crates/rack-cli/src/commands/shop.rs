//! Shop registry commands

use colored::Colorize;
use rack_core::{Shop, ShopStore};

use crate::cli::ShopAddArgs;
use crate::context::AppContext;
use crate::error::{CliError, Result};

/// Register a shop from flags or a YAML file.
pub fn run_shop_add(ctx: &AppContext, args: ShopAddArgs) -> Result<()> {
    let skip_check = args.skip_check;
    let shop = shop_from_args(args)?;

    let mut store = ShopStore::load(&ctx.layout)?;
    if store.get(&shop.name).is_some() {
        return Err(CliError::user(format!(
            "Shop '{}' already exists (remove it first)",
            shop.name
        )));
    }

    if skip_check {
        tracing::debug!(shop = %shop.name, "skipping connection check");
    } else {
        println!(
            "{} Checking connection to {}...",
            "=>".blue().bold(),
            shop.address.cyan()
        );
        shop.transport(ctx.config.remote_timeouts())
            .check_connection()
            .map_err(|e| {
                CliError::user(format!(
                    "Could not reach shop '{}': {} (use --skip-check to add it anyway)",
                    shop.name, e
                ))
            })?;
    }

    let name = shop.name.clone();
    store.add(shop)?;
    store.save(&ctx.layout)?;

    println!("{} Shop {} added.", "OK".green().bold(), name.cyan());
    Ok(())
}

fn shop_from_args(args: ShopAddArgs) -> Result<Shop> {
    if let Some(path) = args.file {
        return Ok(Shop::from_file(&path)?);
    }

    let required = |value: Option<String>, flag: &str| {
        value.ok_or_else(|| CliError::user(format!("--{} is required", flag)))
    };
    Ok(Shop {
        name: required(args.name, "name")?,
        address: required(args.address, "address")?,
        user: required(args.user, "user")?,
        password: String::new(),
        shopwaredir: required(args.shopware_dir, "shopware-dir")?,
        container: required(args.container, "container")?,
        port: args.port,
    })
}

pub fn run_shop_remove(ctx: &AppContext, name: &str) -> Result<()> {
    let mut store = ShopStore::load(&ctx.layout)?;
    store.remove(name)?;
    store.save(&ctx.layout)?;

    println!("{} Shop {} removed.", "OK".green().bold(), name.cyan());
    Ok(())
}

pub fn run_shop_list(ctx: &AppContext) -> Result<()> {
    let store = ShopStore::load(&ctx.layout)?;
    if store.is_empty() {
        println!("No shops configured.");
        println!("Run {} to add one.", "rackjobber shop add".cyan());
        return Ok(());
    }

    println!("{}", "Shops".bold());
    for shop in store.list() {
        let host = if shop.is_local() {
            "local".to_string()
        } else {
            format!("{}@{}", shop.user, shop.address)
        };
        println!(
            "  {:<16} {:<32} {} ({})",
            shop.name.green(),
            host,
            shop.shopwaredir,
            shop.container.dimmed()
        );
    }
    Ok(())
}
