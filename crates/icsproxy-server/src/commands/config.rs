//! Configuration commands.

use anyhow::Context;

use crate::config::ServerConfig;

/// Print the effective configuration to stdout.
pub fn dump(config: &ServerConfig) -> anyhow::Result<()> {
    let toml_str = config.to_toml().context("failed to serialize config")?;
    println!("# config.toml ({})", ServerConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Print the default configuration file path.
pub fn path() -> anyhow::Result<()> {
    println!("{}", ServerConfig::default_path().display());
    Ok(())
}
