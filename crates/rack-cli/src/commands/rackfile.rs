//! Starter rackfile output

use std::path::Path;

use colored::Colorize;
use rack_core::Rackfile;
use rack_fs::io;

use crate::error::{CliError, Result};

/// Print the example rackfile, or write it to `output` if that does not exist yet.
pub fn run_rackfile(output: Option<&Path>) -> Result<()> {
    let yaml = Rackfile::example().to_yaml()?;

    let Some(path) = output else {
        print!("{}", yaml);
        return Ok(());
    };

    if io::exists(path)? {
        return Err(CliError::user(format!(
            "{} already exists",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        io::mkdir_if_absent(parent)?;
    }
    io::write_atomic(path, yaml.as_bytes())?;

    println!("{} Wrote {}", "OK".green().bold(), path.display());
    Ok(())
}
