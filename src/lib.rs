//! Quick launcher popups.
//!
//! A small always-on-top strip of icon tiles docked under the menu bar.
//! Pressing a tile's letter starts its application and exits; Escape just exits.

pub mod assets;
pub mod config;
pub mod geometry;
pub mod keys;
pub mod launch;
pub mod variants;
pub mod window;

use anyhow::Context;
use gpui::Application;
use tracing_subscriber::EnvFilter;

pub use assets::Assets;
pub use config::LauncherConfig;
pub use variants::Variant;

/// Initialize tracing with RUST_LOG env var support.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Load a variant's table and images, then run the launcher until a key ends it.
pub fn run(variant: Variant) -> anyhow::Result<()> {
    let (config, assets) =
        startup(variant).inspect_err(|err| tracing::error!("Startup failed: {:#}", err))?;

    tracing::info!(
        "Starting {} launcher with {} tiles",
        variant.name(),
        assets.tiles.len()
    );

    Application::new().run(move |cx| {
        window::register_keybindings(cx);

        if let Err(err) = window::open(config, assets, cx) {
            tracing::error!("Failed to open launcher window: {:#}", err);
            std::process::exit(1);
        }

        cx.activate(true);
    });

    Ok(())
}

/// Validate the variant's table and decode every image next to the executable.
fn startup(variant: Variant) -> anyhow::Result<(LauncherConfig, Assets)> {
    let config = variant
        .config()
        .with_context(|| format!("Invalid {} launcher table", variant.name()))?;
    let dir = assets::resolve_dir(&config.assets_dir)
        .context("Failed to locate the launcher asset directory")?;
    let assets = Assets::load(&dir, &config)
        .with_context(|| format!("Failed to load launcher images from {}", dir.display()))?;
    Ok((config, assets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_fails_without_icons() {
        // Test binaries live in target/*/deps, which has no icons directory.
        let err = startup(Variant::Chat).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to load launcher images"));
        assert!(err.downcast_ref::<assets::AssetError>().is_some());
    }
}
