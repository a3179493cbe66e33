//! Command: print version information.

/// Version embedded at build time, or the crate version for dev builds.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PLUGIN_INSTALLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to stdout.
pub fn run() {
    println!("plugin-installer {}", version());
}
