use crate::cli::InitArgs;
use crate::config::Configuration;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Write the example configuration to `path`.
pub fn run(path: &Path, args: &InitArgs) -> Result<()> {
    if path.exists() && !args.force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, Configuration::example())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Wrote {}",
        console::style("✓").green().bright(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_write_example_once() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("site").join("inkpress.toml");

        run(&path, &InitArgs { force: false }).expect("can write config");
        Configuration::load(&path).expect("written config loads");

        assert!(run(&path, &InitArgs { force: false }).is_err());
        run(&path, &InitArgs { force: true }).expect("can overwrite with force");
    }
}
