//! Git account commands

use colored::Colorize;
use rack_core::{Config, GitAccount};

use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// Store credentials for `domain`.
///
/// Replacing an existing account needs `--force` or a confirmation.
pub fn run_account_add(
    ctx: &AppContext,
    domain: &str,
    username: &str,
    password: Option<&str>,
    keychain: bool,
    force: bool,
) -> Result<()> {
    let mut config = ctx.config.clone();

    if let Some(existing) = config.account(domain) {
        let question = format!(
            "An account for {} ({}) already exists. Replace it?",
            domain, existing.username
        );
        if !force && !interactive::confirm(&question)? {
            return Err(CliError::user(format!(
                "Account for '{}' already exists (use --force to replace)",
                domain
            )));
        }
    }

    let account = if keychain {
        GitAccount::keychain(domain, username)
    } else {
        let password = match password {
            Some(password) => password.to_string(),
            None if interactive::is_interactive() => {
                interactive::password(&format!("Password for {}@{}", username, domain))?
            }
            None => {
                return Err(CliError::user(
                    "--password is required when not running in a terminal",
                ));
            }
        };
        GitAccount::new(domain, username, &password)
    };

    store(&mut config, account);
    config.save(&ctx.layout)?;

    println!(
        "{} Account for {} saved.",
        "OK".green().bold(),
        domain.cyan()
    );
    Ok(())
}

fn store(config: &mut Config, account: GitAccount) {
    if let Some(previous) = config.set_account(account) {
        tracing::debug!(domain = %previous.domain, "replaced git account");
    }
}

/// Forget the account for `domain`.
pub fn run_account_remove(ctx: &AppContext, domain: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    config.remove_account(domain)?;
    config.save(&ctx.layout)?;

    println!(
        "{} Account for {} removed.",
        "OK".green().bold(),
        domain.cyan()
    );
    Ok(())
}

/// Print stored accounts. Passwords are never shown.
pub fn run_account_list(ctx: &AppContext) -> Result<()> {
    let accounts = &ctx.config.accounts;
    if accounts.is_empty() {
        println!("No git accounts configured.");
        println!(
            "Run {} to add one.",
            "rackjobber account add <domain> -u <user>".cyan()
        );
        return Ok(());
    }

    println!("{}", "Git accounts".bold());
    for account in accounts {
        let marker = if account.inkeychain {
            " (keychain)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<24} {}{}",
            account.domain.green(),
            account.username,
            marker
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rack_fs::ResourceLayout;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> AppContext {
        AppContext {
            layout: ResourceLayout::new(temp.path()),
            config: Config::default(),
        }
    }

    #[test]
    fn add_then_remove_round_trips_through_config() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        run_account_add(&ctx, "github.com", "ci", Some("s3cret"), false, false).unwrap();
        let saved = Config::load(&ctx.layout).unwrap();
        let account = saved.account("github.com").unwrap();
        assert_eq!(account.username, "ci");
        assert_eq!(account.password().as_deref(), Some("s3cret"));

        let ctx = AppContext {
            config: saved,
            ..ctx
        };
        run_account_remove(&ctx, "github.com").unwrap();
        assert!(Config::load(&ctx.layout).unwrap().accounts.is_empty());
    }

    #[test]
    fn keychain_account_stores_no_password() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        run_account_add(&ctx, "gitlab.example.com", "jane", None, true, false).unwrap();
        let saved = Config::load(&ctx.layout).unwrap();
        let account = saved.account("gitlab.example.com").unwrap();
        assert!(account.inkeychain);
        assert!(account.password().is_none());
    }

    #[test]
    fn force_replaces_existing_account() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.config
            .set_account(GitAccount::new("github.com", "old", "pw"));

        run_account_add(&ctx, "github.com", "new", Some("pw"), false, true).unwrap();
        let saved = Config::load(&ctx.layout).unwrap();
        assert_eq!(saved.account("github.com").unwrap().username, "new");
        assert_eq!(saved.accounts.len(), 1);
    }

    #[test]
    fn removing_unknown_account_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        assert!(run_account_remove(&ctx, "nowhere.example.com").is_err());
    }
}
