//! Clean command: remove bundles left behind by earlier runs

use console::Style;
use sitepack::config::SitepackConfig;
use sitepack::error::Result;
use sitepack::lifecycle::BundleRegistry;

/// Run the clean command
///
/// A fresh process tracks no bundles, so every bundle workspace and archive
/// under the root is a leftover, whatever its age.
pub fn run(config: &SitepackConfig) -> Result<()> {
    let registry = BundleRegistry::new(&config.root, config.ttl);
    let removed = registry.purge_untracked()?;

    if removed.is_empty() {
        println!("Nothing to clean in {}", config.root.display());
        return Ok(());
    }

    for path in &removed {
        println!("  {} {}", Style::new().red().apply_to("removed"), path.display());
    }
    println!(
        "{} {} leftover bundle entries from {}",
        Style::new().green().bold().apply_to("Cleaned"),
        removed.len(),
        config.root.display()
    );
    Ok(())
}
