//! Shell snippets for file access on the host
//!
//! Paths are quoted with `shell_words` so directory names with spaces survive.

use shell_words::quote;

/// Exit code used by [`read_file`] when the file does not exist.
pub const NOT_FOUND_EXIT: i32 = 44;

pub fn read_file(path: &str) -> String {
    let p = quote(path);
    format!("if [ -f {p} ]; then cat {p}; else exit {NOT_FOUND_EXIT}; fi")
}

/// Write stdin to `path` through a temp file so readers never see a partial file.
pub fn write_file(path: &str) -> String {
    let tmp = format!("{path}.rackjobber.tmp");
    let parent = match path.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir,
        Some(_) => "/",
        None => ".",
    };
    format!(
        "mkdir -p {dir} && cat > {tmp} && mv -f {tmp} {p}",
        dir = quote(parent),
        tmp = quote(&tmp),
        p = quote(path)
    )
}

/// List subdirectory names of `dir`, one per line with a trailing slash.
///
/// An absent or empty directory lists nothing.
pub fn list_dirs(dir: &str) -> String {
    format!(
        "if [ -d {d} ]; then cd {d} && for e in */; do [ -d \"$e\" ] && echo \"$e\"; done; fi; true",
        d = quote(dir)
    )
}

/// Parse the output of [`list_dirs`] (or `ls -d */`) into bare names.
pub fn parse_dir_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim().trim_end_matches('/'))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Foo/\nBaz/\n\n", &["Foo", "Baz"])]
    #[case("Foo\n", &["Foo"])]
    #[case("  Bar/  \n", &["Bar"])]
    #[case("", &[])]
    fn listing_strips_trailing_slashes(#[case] output: &str, #[case] expected: &[&str]) {
        let expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_dir_listing(output), expected);
    }

    #[test]
    fn paths_with_spaces_are_quoted() {
        assert_eq!(
            read_file("/srv/my shop/custom/rackfile.yaml"),
            "if [ -f '/srv/my shop/custom/rackfile.yaml' ]; then cat '/srv/my shop/custom/rackfile.yaml'; else exit 44; fi"
        );
    }

    #[test]
    fn write_goes_through_temp_file() {
        let script = write_file("/srv/shop/custom/rackpluginhashes.yaml");
        assert!(script.starts_with("mkdir -p /srv/shop/custom && cat > "));
        assert!(script.ends_with("mv -f /srv/shop/custom/rackpluginhashes.yaml.rackjobber.tmp /srv/shop/custom/rackpluginhashes.yaml"));
    }
}
