//! Sweep command: remove bundles left under the root past their TTL

use std::time::SystemTime;

use console::Style;
use sitepack::config::SitepackConfig;
use sitepack::error::Result;
use sitepack::lifecycle::BundleRegistry;

/// Run the sweep command
///
/// Unlike `clean`, bundles younger than the TTL are kept, so a build that
/// is still waiting for its download survives.
pub fn run(config: &SitepackConfig) -> Result<()> {
    let registry = BundleRegistry::new(&config.root, config.ttl);
    let removed = registry.sweep_stale(SystemTime::now())?;

    if removed.is_empty() {
        println!("No expired bundles in {}", config.root.display());
        return Ok(());
    }

    for path in &removed {
        println!("  {} {}", Style::new().red().apply_to("removed"), path.display());
    }
    println!(
        "{} {} expired bundle entries from {}",
        Style::new().green().bold().apply_to("Swept"),
        removed.len(),
        config.root.display()
    );
    Ok(())
}
