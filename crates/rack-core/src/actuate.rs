//! Turning planned actions into shop console commands
//!
//! Every console call goes through the shop's docker container:
//! `docker exec -i <container> php /var/www/html/bin/console <command>`.
//! Commands run strictly in order; the first failure aborts the batch.

use rack_git::remote_url::redact;
use rack_remote::{RemoteCommand, Transport};
use shell_words::quote;

use crate::plan::{CheckoutMode, UpdateAction};
use crate::state::{PLUGINS_DIR, remote_path};
use crate::Result;

const CONSOLE: &str = "php /var/www/html/bin/console";

/// Builds the command sequences for one shop.
#[derive(Debug, Clone, Copy)]
pub struct ShopCommands<'a> {
    container: &'a str,
    shopware_dir: &'a str,
}

impl<'a> ShopCommands<'a> {
    pub fn new(container: &'a str, shopware_dir: &'a str) -> Self {
        Self {
            container,
            shopware_dir,
        }
    }

    fn console(&self, args: &str) -> RemoteCommand {
        RemoteCommand::new(format!(
            "docker exec -i {} {CONSOLE} {args}",
            quote(self.container)
        ))
    }

    /// Where the plugin's clone lives on the host.
    pub fn plugin_path(&self, name: &str) -> String {
        remote_path(self.shopware_dir, &format!("{PLUGINS_DIR}/{name}"))
    }

    pub fn delete(&self, name: &str) -> Vec<RemoteCommand> {
        let n = quote(name);
        vec![
            self.console("sw:plugin:refresh -q"),
            self.console(&format!("sw:plugin:deactivate -q {n}")),
            self.console(&format!("sw:plugin:uninstall -S -q {n}")),
            self.console(&format!("sw:plugin:delete -q {n}")),
        ]
    }

    /// Clone the version branch. `clone_url` may carry credentials; the label never does.
    pub fn clone(&self, name: &str, version: &str, clone_url: &str) -> RemoteCommand {
        let render = |url: &str| {
            format!(
                "git clone --single-branch --branch {} {} {}",
                quote(version),
                quote(url),
                quote(&self.plugin_path(name))
            )
        };
        RemoteCommand::redacted(render(clone_url), render(&redact(clone_url)))
    }

    pub fn checkout(&self, name: &str, version: &str) -> Vec<RemoteCommand> {
        let n = quote(name);
        let path = self.plugin_path(name);
        let p = quote(&path);
        let v = quote(version);
        let refspec_raw = format!("+refs/tags/{version}:refs/tags/{version}");
        let refspec = quote(&refspec_raw);
        vec![
            self.console("sw:plugin:refresh -q"),
            self.console(&format!("sw:plugin:deactivate -q {n}")),
            RemoteCommand::new(format!("git -C {p} config remote.origin.fetch {refspec}")),
            RemoteCommand::new(format!("git -C {p} fetch")),
            RemoteCommand::new(format!("git -C {p} checkout {v}")),
            self.console(&format!("sw:plugin:update -q {n}")),
        ]
    }

    pub fn install(&self, name: &str) -> Vec<RemoteCommand> {
        vec![
            self.console("sw:plugin:refresh -q"),
            self.console(&format!("sw:plugin:install -q {}", quote(name))),
        ]
    }

    pub fn activate(&self, name: &str) -> RemoteCommand {
        self.console(&format!("sw:plugin:activate -q {}", quote(name)))
    }

    /// Theme names go to the console with spaces replaced by underscores.
    pub fn set_theme(&self, theme: &str) -> RemoteCommand {
        let escaped = theme.trim().replace(' ', "_");
        self.console(&format!("wdy:theme:set -q {}", quote(&escaped)))
    }

    pub fn theme_initialize(&self) -> RemoteCommand {
        self.console("sw:theme:initialize -q")
    }

    pub fn cache_clear(&self) -> RemoteCommand {
        self.console("sw:cache:clear -q")
    }

    /// The full sequence for one update action.
    pub fn update(&self, action: &UpdateAction, clone_url: &str) -> Vec<RemoteCommand> {
        let mut commands = Vec::new();
        if action.checkout == CheckoutMode::Clone {
            commands.push(self.clone(&action.name, &action.version, clone_url));
        }
        commands.extend(self.checkout(&action.name, &action.version));
        if action.steps.install {
            commands.extend(self.install(&action.name));
        }
        if action.steps.activate {
            commands.push(self.activate(&action.name));
        }
        if let Some(theme) = &action.steps.theme {
            commands.push(self.set_theme(theme));
        }
        commands
    }
}

/// Executes command batches on one shop.
pub struct RemoteActuator<'a> {
    transport: &'a dyn Transport,
    commands: ShopCommands<'a>,
}

impl<'a> RemoteActuator<'a> {
    pub fn new(transport: &'a dyn Transport, commands: ShopCommands<'a>) -> Self {
        Self { transport, commands }
    }

    pub fn commands(&self) -> &ShopCommands<'a> {
        &self.commands
    }

    fn run_all(&self, batch: &[RemoteCommand]) -> Result<()> {
        for command in batch {
            tracing::debug!(host = %self.transport.describe(), command = %command, "running");
            self.transport.run(command)?;
        }
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        tracing::info!(component = %name, "deleting plugin");
        self.run_all(&self.commands.delete(name))
    }

    pub fn initialize_theme(&self) -> Result<()> {
        self.run_all(&[self.commands.theme_initialize()])
    }

    pub fn update(&self, action: &UpdateAction, clone_url: &str) -> Result<()> {
        tracing::info!(component = %action.name, version = %action.version, "updating plugin");
        self.run_all(&self.commands.update(action, clone_url))
    }

    pub fn clear_cache(&self) -> Result<()> {
        tracing::info!("clearing shop cache");
        self.run_all(&[self.commands.cache_clear()])
    }
}
