//! `geoip config` — manage geoip.toml.

use std::path::Path;

use anyhow::{bail, Result};
use geoip_core::GeoIpConfig;

pub fn init(path: &str) -> Result<()> {
    let output = Path::new(path);
    if output.exists() {
        bail!("{} already exists", output.display());
    }

    std::fs::write(output, GeoIpConfig::default().to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
