//! Plugin scaffolding and rackspec integration
//!
//! Works on a Shopware 5 plugin directory: create a skeleton, derive a
//! rackspec from `plugin.xml`, or remove the rackspec again.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rack_fs::io;
use rack_git::GitClient;
use regex::Regex;

use crate::catalog::SpecCatalog;
use crate::spec::{Compatibility, ComponentSpec, Source, find_spec_file};
use crate::version::BASELINE_VERSION;
use crate::{Error, Result};

/// File name of the Shopware plugin descriptor.
pub const PLUGIN_XML: &str = "plugin.xml";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| element_regex("version"));
static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| element_regex("author"));
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| element_regex("description"));
static COMPATIBILITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<compatibility\b([^>]*)/?>").expect("valid regex"));
static MIN_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"minVersion\s*=\s*"([^"]*)""#).expect("valid regex"));
static MAX_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"maxVersion\s*=\s*"([^"]*)""#).expect("valid regex"));

fn element_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?s)<{tag}\b[^>]*>(.*?)</{tag}>")).expect("valid regex")
}

/// The parts of `plugin.xml` a rackspec is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginXml {
    pub version: String,
    pub author: String,
    pub description: String,
    pub compatibility: Compatibility,
}

impl PluginXml {
    pub fn parse(text: &str) -> Self {
        let element = |re: &Regex| {
            re.captures(text)
                .map(|c| unescape_xml(c[1].trim()))
                .unwrap_or_default()
        };
        let attributes = COMPATIBILITY_RE
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let attribute = |re: &Regex| {
            re.captures(&attributes)
                .map(|c| unescape_xml(&c[1]))
                .unwrap_or_default()
        };
        Self {
            version: element(&VERSION_RE),
            author: element(&AUTHOR_RE),
            description: element(&DESCRIPTION_RE),
            compatibility: Compatibility {
                min_version: attribute(&MIN_VERSION_RE),
                max_version: attribute(&MAX_VERSION_RE),
            },
        }
    }

    /// Read `plugin.xml` from a plugin directory.
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(PLUGIN_XML);
        match io::read_text_if_exists(&path)? {
            Some(text) => Ok(Self::parse(&text)),
            None => Err(Error::PluginXmlNotFound {
                dir: dir.to_path_buf(),
            }),
        }
    }
}

/// Optional `plugin.xml` fields for [`init`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
    pub copyright: Option<String>,
    pub license: Option<String>,
    pub link: Option<String>,
}

/// Create `<parent>/<name>/` with a plugin bootstrap class and `plugin.xml`.
pub fn init(parent: &Path, name: &str, options: &InitOptions) -> Result<PathBuf> {
    validate_plugin_name(name)?;
    let dir = parent.join(name);
    io::mkdir_if_absent(&dir)?;

    let bootstrap = dir.join(format!("{name}.php"));
    io::write_atomic(&bootstrap, bootstrap_php(name).as_bytes())?;
    io::write_atomic(&dir.join(PLUGIN_XML), plugin_xml(name, options).as_bytes())?;

    tracing::info!(plugin = %name, dir = %dir.display(), "created plugin skeleton");
    Ok(dir)
}

fn validate_plugin_name(name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput {
            message: format!("'{name}' is not a valid plugin name (letters, digits, underscores)"),
        })
    }
}

fn bootstrap_php(name: &str) -> String {
    format!(
        "<?php\n\nnamespace {name};\n\nuse Shopware\\Components\\Plugin;\n\nclass {name} extends Plugin\n{{\n\n}}\n"
    )
}

fn plugin_xml(name: &str, options: &InitOptions) -> String {
    let version = options.version.as_deref().unwrap_or(BASELINE_VERSION);
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<plugin>\n");
    xml.push_str(&format!("    <label>{}</label>\n", escape_xml(name)));

    let elements = [
        ("description", options.description.as_deref()),
        ("version", Some(version)),
        ("copyright", options.copyright.as_deref()),
        ("license", options.license.as_deref()),
        ("link", options.link.as_deref()),
        ("author", options.author.as_deref()),
    ];
    for (tag, value) in elements {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            xml.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_xml(value)));
        }
    }

    let min = options.min_version.as_deref().filter(|v| !v.is_empty());
    let max = options.max_version.as_deref().filter(|v| !v.is_empty());
    if min.is_some() || max.is_some() {
        xml.push_str("    <compatibility");
        if let Some(min) = min {
            xml.push_str(&format!(" minVersion=\"{}\"", escape_xml(min)));
        }
        if let Some(max) = max {
            xml.push_str(&format!(" maxVersion=\"{}\"", escape_xml(max)));
        }
        xml.push_str("/>\n");
    }

    xml.push_str(&format!(
        "    <changelog version=\"{}\">\n        <changes>Initial version</changes>\n    </changelog>\n</plugin>\n",
        escape_xml(version)
    ));
    xml
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Name of the plugin bootstrap class, taken from the first `*.php` file.
fn plugin_name(dir: &Path) -> Result<String> {
    let entries = std::fs::read_dir(dir).map_err(|e| rack_fs::Error::io(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| rack_fs::Error::io(dir, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if let Some(stem) = file_name.strip_suffix(".php") {
            if entry.path().is_file() {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    names.into_iter().next().ok_or_else(|| Error::InvalidInput {
        message: format!("no plugin bootstrap (*.php) in {}", dir.display()),
    })
}

/// The frontend theme shipped by the plugin, if any.
fn theme_name(dir: &Path) -> Result<String> {
    let themes_dir = dir.join("Resources").join("Themes").join("Frontend");
    if !io::exists(&themes_dir)? {
        return Ok(String::new());
    }
    let themes = io::list_subdirs(&themes_dir)?;
    if themes.len() > 1 {
        tracing::warn!(themes = ?themes, "several frontend themes found, using the first");
    }
    Ok(themes.into_iter().next().unwrap_or_default())
}

/// Build a rackspec for the plugin in `dir` from its `plugin.xml`, bootstrap
/// class, theme directory, and git origin.
pub fn describe(dir: &Path, git: &GitClient) -> Result<ComponentSpec> {
    let xml = PluginXml::read(dir)?;
    let name = plugin_name(dir)?;
    let source = git.remote_url(dir)?;
    Ok(ComponentSpec {
        name,
        version: xml.version,
        description: xml.description,
        author: xml.author,
        compatibility: xml.compatibility,
        source: Source { git: source },
        theme: theme_name(dir)?,
    })
}

/// Write `<Name>_rackspec.yaml` into `dir`. An existing file is never overwritten.
pub fn integrate(dir: &Path, git: &GitClient) -> Result<PathBuf> {
    let spec = describe(dir, git)?;
    let path = dir.join(spec.file_name());
    if io::exists(&path)? {
        return Err(Error::AlreadyExists { path });
    }
    io::write_atomic(&path, spec.to_yaml()?.as_bytes())?;
    tracing::info!(plugin = %spec.name, version = %spec.version, path = %path.display(), "created rackspec");
    Ok(path)
}

/// Remove the rackspec from `dir`.
pub fn deintegrate(dir: &Path) -> Result<PathBuf> {
    let path = find_spec_file(dir)?.ok_or_else(|| Error::RackspecNotFound {
        dir: dir.to_path_buf(),
    })?;
    std::fs::remove_file(&path).map_err(|e| rack_fs::Error::io(&path, e))?;
    tracing::info!(path = %path.display(), "removed rackspec");
    Ok(path)
}

/// Component names in the catalog, optionally limited to one repository.
pub fn list(catalog: &SpecCatalog, repo: Option<&str>) -> Result<Vec<String>> {
    if let Some(repo) = repo {
        if !catalog.repos()?.iter().any(|r| r == repo) {
            return Err(Error::RepoNotFound { name: repo.to_string() });
        }
    }
    catalog.component_names(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rack_test_utils::catalog::TestCatalog;
    use rack_test_utils::git::{git, real_git_repo_with_commit};

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<plugin xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <label lang="en">Cart Rules</label>
    <version>1.4.2</version>
    <author>worldiety &amp; friends</author>
    <description>Adds cart rules</description>
    <compatibility minVersion="5.4.0" maxVersion="5.7.99"/>
    <changelog version="1.4.2">
        <changes>Fix</changes>
    </changelog>
</plugin>
"#;

    #[test]
    fn parses_plugin_xml_fields() {
        let xml = PluginXml::parse(SAMPLE_XML);
        assert_eq!(xml.version, "1.4.2");
        assert_eq!(xml.author, "worldiety & friends");
        assert_eq!(xml.description, "Adds cart rules");
        assert_eq!(xml.compatibility.min_version, "5.4.0");
        assert_eq!(xml.compatibility.max_version, "5.7.99");
    }

    #[test]
    fn missing_elements_are_empty() {
        let xml = PluginXml::parse("<plugin><version>1.0.0</version></plugin>");
        assert_eq!(xml.version, "1.0.0");
        assert_eq!(xml.author, "");
        assert_eq!(xml.compatibility, Compatibility::default());
    }

    #[test]
    fn init_writes_skeleton_with_default_version() {
        let dir = tempfile::tempdir().unwrap();
        let plugin_dir = init(dir.path(), "WdyCart", &InitOptions::default()).unwrap();

        let php = std::fs::read_to_string(plugin_dir.join("WdyCart.php")).unwrap();
        assert!(php.contains("namespace WdyCart;"));
        assert!(php.contains("class WdyCart extends Plugin"));

        let xml = PluginXml::read(&plugin_dir).unwrap();
        assert_eq!(xml.version, BASELINE_VERSION);
    }

    #[test]
    fn init_includes_given_options() {
        let dir = tempfile::tempdir().unwrap();
        let options = InitOptions {
            version: Some("2.0.0".into()),
            author: Some("Jane".into()),
            min_version: Some("5.6.0".into()),
            ..Default::default()
        };
        let plugin_dir = init(dir.path(), "WdyCart", &options).unwrap();

        let text = std::fs::read_to_string(plugin_dir.join(PLUGIN_XML)).unwrap();
        assert!(text.contains(r#"<compatibility minVersion="5.6.0"/>"#));
        assert!(text.contains(r#"<changelog version="2.0.0">"#));
        let xml = PluginXml::parse(&text);
        assert_eq!(xml.author, "Jane");
        assert_eq!(xml.version, "2.0.0");
    }

    #[test]
    fn init_rejects_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            init(dir.path(), "../evil", &InitOptions::default()),
            Err(Error::InvalidInput { .. })
        ));
    }

    fn plugin_checkout(theme: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        real_git_repo_with_commit(dir.path());
        git(dir.path(), &["remote", "add", "origin", "https://git.example.com/wdy/WdyCart.git"]);
        std::fs::write(dir.path().join("WdyCart.php"), "<?php\n").unwrap();
        std::fs::write(dir.path().join(PLUGIN_XML), SAMPLE_XML).unwrap();
        if let Some(theme) = theme {
            std::fs::create_dir_all(dir.path().join("Resources/Themes/Frontend").join(theme)).unwrap();
        }
        dir
    }

    #[test]
    fn integrate_writes_rackspec_and_refuses_overwrite() {
        let dir = plugin_checkout(Some("WdyTheme"));
        let git_client = GitClient::anonymous();

        let path = integrate(dir.path(), &git_client).unwrap();
        assert_eq!(path, dir.path().join("WdyCart_rackspec.yaml"));

        let spec = ComponentSpec::load(&path).unwrap();
        assert_eq!(spec.name, "WdyCart");
        assert_eq!(spec.version, "1.4.2");
        assert_eq!(spec.source_url(), "https://git.example.com/wdy/WdyCart.git");
        assert_eq!(spec.theme(), Some("WdyTheme"));
        assert_eq!(spec.compatibility.min_version, "5.4.0");

        assert!(matches!(
            integrate(dir.path(), &git_client),
            Err(Error::AlreadyExists { .. })
        ));
    }

    #[test]
    fn integrate_without_plugin_xml_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            integrate(dir.path(), &GitClient::anonymous()),
            Err(Error::PluginXmlNotFound { .. })
        ));
    }

    #[test]
    fn deintegrate_removes_rackspec_then_reports_not_found() {
        let dir = plugin_checkout(None);
        integrate(dir.path(), &GitClient::anonymous()).unwrap();

        let removed = deintegrate(dir.path()).unwrap();
        assert!(!removed.exists());
        assert!(matches!(
            deintegrate(dir.path()),
            Err(Error::RackspecNotFound { .. })
        ));
    }

    #[test]
    fn list_reads_catalog_names() {
        let catalog = TestCatalog::new();
        catalog.add_spec("master", "Zeta", "1.0.0", "https://x/zeta.git", "");
        catalog.add_spec("master", "Alpha", "1.0.0", "https://x/alpha.git", "");
        catalog.add_spec("extra", "Beta", "1.0.0", "https://x/beta.git", "");
        let specs = SpecCatalog::new(catalog.repos_dir());

        assert_eq!(list(&specs, None).unwrap(), vec!["Alpha", "Beta", "Zeta"]);
        assert_eq!(list(&specs, Some("extra")).unwrap(), vec!["Beta"]);
        assert!(matches!(list(&specs, Some("missing")), Err(Error::RepoNotFound { .. })));
    }
}
