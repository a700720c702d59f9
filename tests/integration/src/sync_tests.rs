//! Sync runs against real git upstreams and a fake shop host
//!
//! The catalog is a real clone of a bare master repository, component hashes
//! come from real tags through `GitClient`, and only the shop is simulated.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rack_core::{
    FixedAnswer, HashLedger, RepoManager, ShopTarget, SpecCatalog, SyncOptions, SyncOrchestrator,
    SyncOutcome, SyncReport, SyncSettings,
};
use rack_fs::ResourceLayout;
use rack_git::GitClient;
use rack_test_utils::catalog::rackspec_yaml;
use rack_test_utils::git::{bare_upstream, commit_file, git, push_seed, tag};
use rack_test_utils::transport::FakeTransport;
use tempfile::TempDir;

const SHOP_DIR: &str = "/srv/shop";
const RACKFILE: &str = "/srv/shop/custom/rackfile.yaml";
const LEDGER: &str = "/srv/shop/custom/rackpluginhashes.yaml";
const PLUGINS: &str = "/srv/shop/custom/plugins";

struct World {
    dir: TempDir,
    layout: ResourceLayout,
    git: GitClient,
    master: PathBuf,
    master_seed: PathBuf,
}

impl World {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let (master, master_seed) = bare_upstream(dir.path(), "Rackspecs");
        let layout = ResourceLayout::new(dir.path().join("resources"));
        Self {
            dir,
            layout,
            git: GitClient::anonymous(),
            master,
            master_seed,
        }
    }

    fn repos(&self) -> RepoManager<'_> {
        RepoManager::new(&self.layout, &self.git).with_master_url(path_str(&self.master))
    }

    fn catalog(&self) -> SpecCatalog {
        SpecCatalog::new(self.layout.repos_dir())
    }

    /// A plugin upstream with one commit per release, each tagged. Returns
    /// the source URL, the seed checkout, and the tagged commit ids.
    fn plugin(&self, name: &str, releases: &[&str]) -> (String, PathBuf, Vec<String>) {
        let (bare, seed) = bare_upstream(self.dir.path(), name);
        let hashes = releases
            .iter()
            .map(|version| {
                commit_file(
                    &seed,
                    "plugin.xml",
                    &format!("<plugin><version>{version}</version></plugin>"),
                    &format!("Release {version}"),
                );
                tag(&seed, version)
            })
            .collect();
        push_seed(&seed);
        (path_str(&bare), seed, hashes)
    }

    /// Publish a rackspec to the master upstream.
    fn publish(&self, name: &str, version: &str, source: &str, theme: &str) {
        commit_file(
            &self.master_seed,
            &format!("{name}/{version}/{name}_rackspec.yaml"),
            &rackspec_yaml(name, version, source, theme),
            &format!("Add {name} {version}"),
        );
        push_seed(&self.master_seed);
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn shop(rackfile: &str, installed: &[&str]) -> FakeTransport {
    FakeTransport::new()
        .with_file(RACKFILE, rackfile)
        .with_dirs(PLUGINS, installed)
}

fn target<'a>(name: &'a str, transport: &'a FakeTransport) -> ShopTarget<'a> {
    ShopTarget {
        name,
        transport,
        shopware_dir: SHOP_DIR,
        container: "shop_app",
    }
}

fn completed(outcome: SyncOutcome) -> SyncReport {
    match outcome {
        SyncOutcome::Completed(report) => report,
        other => panic!("expected a completed run, got {other:?}"),
    }
}

fn ledger(transport: &FakeTransport) -> HashLedger {
    HashLedger::from_yaml(LEDGER, &transport.file(LEDGER).expect("ledger written")).unwrap()
}

#[test]
fn sync_converges_and_follows_new_releases() {
    let world = World::new();
    let (foo, foo_seed, foo_hashes) = world.plugin("Foo", &["1.0.0", "1.1.0"]);
    let (bar, _, bar_hashes) = world.plugin("Bar", &["1.0.0"]);
    world.publish("Foo", "1.0.0", &foo, "");
    world.publish("Foo", "1.1.0", &foo, "Foo Theme");
    world.publish("Bar", "1.0.0", &bar, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let catalog = world.catalog();
    let prompt = FixedAnswer(false);
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, SyncSettings::default());
    let transport = shop("Plugins:\n- Foo:latest\n- Bar:1.0.0:noactivate\n", &["Foo", "Baz"]);

    let first = completed(orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap());
    assert_eq!(first.removed, vec!["Baz"]);
    assert_eq!(first.updated, vec!["Foo", "Bar"]);
    let expected: HashLedger = [("Foo", foo_hashes[1].as_str()), ("Bar", bar_hashes[0].as_str())]
        .into_iter()
        .collect();
    assert_eq!(ledger(&transport), expected);

    let commands = transport.commands();
    assert!(commands.iter().any(|c| c.contains("git -C /srv/shop/custom/plugins/Foo checkout 1.1.0")));
    assert!(commands.iter().any(|c| c.contains("wdy:theme:set -q Foo_Theme")));
    assert!(
        commands
            .iter()
            .any(|c| c.starts_with("git clone --single-branch --branch 1.0.0") && c.contains(&bar))
    );
    assert!(!commands.iter().any(|c| c.contains("sw:plugin:activate -q Bar")));

    // Nothing moved upstream: only housekeeping, ledger untouched.
    transport.set_dirs(PLUGINS, &["Foo", "Bar"]);
    let second = completed(orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap());
    assert!(second.is_noop());
    assert_eq!(second.up_to_date, vec!["Foo", "Bar"]);
    assert_eq!(ledger(&transport), expected);

    // A new Foo release reaches the shop through the refreshed catalog.
    commit_file(&foo_seed, "plugin.xml", "<plugin><version>1.2.0</version></plugin>", "Release 1.2.0");
    let foo_120 = tag(&foo_seed, "1.2.0");
    push_seed(&foo_seed);
    world.publish("Foo", "1.2.0", &foo, "");

    transport.clear_commands();
    let third = completed(orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap());
    assert_eq!(third.updated, vec!["Foo"]);
    assert_eq!(third.up_to_date, vec!["Bar"]);
    assert_eq!(ledger(&transport).get("Foo"), Some(foo_120.as_str()));
    assert!(
        transport
            .commands()
            .iter()
            .any(|c| c.contains("git -C /srv/shop/custom/plugins/Foo checkout 1.2.0"))
    );
}

#[test]
fn moved_tag_triggers_reinstall_of_same_version() {
    let world = World::new();
    let (bar, bar_seed, _) = world.plugin("Bar", &["1.0.0"]);
    world.publish("Bar", "1.0.0", &bar, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let catalog = world.catalog();
    let prompt = FixedAnswer(false);
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, SyncSettings::default());
    let transport = shop("Plugins:\n- Bar:1.0.0\n", &[]);

    completed(orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap());
    transport.set_dirs(PLUGINS, &["Bar"]);

    let hotfix = commit_file(&bar_seed, "fix.txt", "hotfix", "Hotfix");
    git(&bar_seed, &["tag", "-f", "1.0.0"]);
    git(&bar_seed, &["push", "-q", "-f", "origin", "--tags"]);

    let report = completed(orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap());
    assert_eq!(report.updated, vec!["Bar"]);
    assert_eq!(ledger(&transport).get("Bar"), Some(hotfix.as_str()));
}

#[test]
fn untagged_version_is_skipped_and_others_proceed() {
    let world = World::new();
    let (foo, _, foo_hashes) = world.plugin("Foo", &["1.0.0"]);
    let (qux, _, _) = world.plugin("Qux", &["1.0.0"]);
    world.publish("Foo", "1.0.0", &foo, "");
    world.publish("Qux", "2.0.0", &qux, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let catalog = world.catalog();
    let prompt = FixedAnswer(false);
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, SyncSettings::default());
    let transport = shop("Plugins:\n- Qux\n- Foo\n", &[]);

    let report = completed(orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap());
    assert_eq!(report.updated, vec!["Foo"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "Qux");

    let saved = ledger(&transport);
    assert_eq!(saved.get("Foo"), Some(foo_hashes[0].as_str()));
    assert_eq!(saved.get("Qux"), None);
}

#[test]
fn mandatory_plugins_reach_every_shop_in_parallel() {
    let world = World::new();
    let (base, _, base_hashes) = world.plugin("Base", &["2.0.0"]);
    let (foo, _, _) = world.plugin("Foo", &["1.0.0"]);
    world.publish("Base", "2.0.0", &base, "");
    world.publish("Foo", "1.0.0", &foo, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let catalog = world.catalog();
    let prompt = FixedAnswer(false);
    let settings = SyncSettings {
        mandatory: vec!["Base".to_string()],
        ..Default::default()
    };
    let orchestrator = SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, settings);
    orchestrator.refresh_catalog().unwrap();

    let staging = shop("Plugins:\n- Foo\n", &[]);
    let live = shop("", &["Legacy"]);

    let reports: Vec<SyncReport> = std::thread::scope(|scope| {
        let handles = [("staging", &staging), ("live", &live)].map(|(name, transport)| {
            let orchestrator = &orchestrator;
            scope.spawn(move || orchestrator.sync_shop(target(name, transport), &SyncOptions::default()))
        });
        handles
            .into_iter()
            .map(|handle| completed(handle.join().unwrap().unwrap()))
            .collect()
    });

    assert_eq!(reports[0].updated, vec!["Foo", "Base"]);
    assert_eq!(reports[1].removed, vec!["Legacy"]);
    assert_eq!(reports[1].updated, vec!["Base"]);
    assert_eq!(ledger(&live).get("Base"), Some(base_hashes[0].as_str()));
    assert_eq!(ledger(&staging).len(), 2);
}

#[test]
fn unknown_component_with_accepted_remirror_restarts() {
    let world = World::new();
    let (foo, _, _) = world.plugin("Foo", &["1.0.0"]);
    world.publish("Foo", "1.0.0", &foo, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let catalog = world.catalog();
    let prompt = FixedAnswer(true);
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, SyncSettings::default());
    let transport = shop("Plugins:\n- Foo\n- Ghost\n", &[]);

    let outcome = orchestrator.run(target("live", &transport), &SyncOptions::default()).unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::RestartRequired {
            component: "Ghost".to_string()
        }
    );
    assert_eq!(transport.write_count(), 0);
    assert!(world.layout.master_repo_dir().join("Foo").join("1.0.0").exists());
}

#[test]
fn parallel_shops_defer_the_remirror_until_all_are_done() {
    let world = World::new();
    let (foo, _, _) = world.plugin("Foo", &["1.0.0"]);
    world.publish("Foo", "1.0.0", &foo, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let marker = world.layout.master_repo_dir().join("local-marker");
    std::fs::write(&marker, "x").unwrap();

    let catalog = world.catalog();
    let prompt = FixedAnswer(true);
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, SyncSettings::default());
    let options = SyncOptions {
        defer_remirror: true,
        ..Default::default()
    };
    let staging = shop("Plugins:\n- Foo\n- Ghost\n", &[]);
    let live = shop("Plugins:\n- Ghost\n", &[]);

    let outcomes: Vec<SyncOutcome> = std::thread::scope(|scope| {
        let handles = [("staging", &staging), ("live", &live)].map(|(name, transport)| {
            let (orchestrator, options) = (&orchestrator, &options);
            scope.spawn(move || orchestrator.sync_shop(target(name, transport), options))
        });
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    });

    assert!(outcomes
        .iter()
        .all(|o| matches!(o, SyncOutcome::RestartRequired { component } if component == "Ghost")));
    assert!(marker.exists(), "catalog must stay in place while shops are syncing");

    orchestrator.remirror().unwrap();
    assert!(!marker.exists());
    assert!(world.layout.master_repo_dir().join("Foo").join("1.0.0").exists());
}

#[test]
fn dry_run_leaves_shop_and_ledger_alone() {
    let world = World::new();
    let (foo, _, _) = world.plugin("Foo", &["1.0.0"]);
    world.publish("Foo", "1.0.0", &foo, "");

    let repos = world.repos();
    repos.setup().unwrap();
    let catalog = world.catalog();
    let prompt = FixedAnswer(false);
    let orchestrator =
        SyncOrchestrator::new(&catalog, &repos, &world.git, &prompt, SyncSettings::default());
    let transport = shop("Plugins:\n- Foo\n", &["Old"]);

    let report = completed(
        orchestrator
            .run(target("live", &transport), &SyncOptions {
                dry_run: true,
                ..Default::default()
            })
            .unwrap(),
    );
    assert!(report.dry_run);
    assert_eq!(report.removed, vec!["Old"]);
    assert_eq!(report.updated, vec!["Foo"]);
    assert!(!report.ledger_saved);
    assert!(transport.commands().is_empty());
    assert_eq!(transport.write_count(), 0);
}
