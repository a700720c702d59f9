//! Command implementations for rack-cli

pub mod account;
pub mod plugin;
pub mod rackfile;
pub mod repo;
pub mod setup;
pub mod shop;
pub mod up;

pub use account::{run_account_add, run_account_list, run_account_remove};
pub use plugin::{run_plugin_deintegrate, run_plugin_init, run_plugin_integrate, run_plugin_list};
pub use rackfile::run_rackfile;
pub use repo::{run_repo_add, run_repo_list, run_repo_push, run_repo_remove, run_repo_update};
pub use setup::run_setup;
pub use shop::{run_shop_add, run_shop_list, run_shop_remove};
pub use up::run_up;

use rack_git::MirrorStatus;

/// One-line description of a mirror refresh.
pub(crate) fn describe_status(status: &MirrorStatus) -> String {
    match status {
        MirrorStatus::Cloned => "cloned".to_string(),
        MirrorStatus::Updated { from, to } => {
            format!("updated {}..{}", short(from), short(to))
        }
        MirrorStatus::AlreadyUpToDate => "already up to date".to_string(),
    }
}

fn short(oid: &str) -> &str {
    oid.get(..7).unwrap_or(oid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_status_shows_short_hashes() {
        let status = MirrorStatus::Updated {
            from: "0123456789abcdef".into(),
            to: "fedcba9876543210".into(),
        };
        assert_eq!(describe_status(&status), "updated 0123456..fedcba9");
    }

    #[test]
    fn short_hash_tolerates_short_input() {
        assert_eq!(short("abc"), "abc");
    }
}
