//! Version command implementation

use sitepack::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    println!("sitepack {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
