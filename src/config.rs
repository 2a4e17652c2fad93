//! Launcher configuration.
//!
//! A variant is described by a TOML document holding the layout metrics, the
//! tile table and the command table. [`RawConfig::validate`] folds the two
//! tables into a single ordered list of [`Entry`] records.

use std::collections::BTreeMap;
use std::path::PathBuf;

use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;

use crate::launch::LaunchCommand;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse launcher table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no tiles configured")]
    NoTiles,
    #[error("trigger key {0:?} must be exactly one character")]
    InvalidKey(String),
    #[error("trigger key '{0}' is used by more than one tile")]
    DuplicateKey(char),
    #[error("tile for key '{0}' has an empty display name")]
    EmptyName(char),
    #[error("tile '{0}' has no launch command")]
    MissingCommand(char),
    #[error("launch command for '{0}' has no matching tile")]
    OrphanCommand(char),
    #[error("launch command for '{0}' has no program")]
    EmptyCommand(char),
}

/// Window and tile metrics, all in logical pixels unless noted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub icon_size: u32,
    pub font_family: String,
    pub font_size: f32,
    /// Offset from the top of the screen, below the system menu bar.
    pub menu_bar_height: i32,
    /// Subtracted from the natural content height.
    pub height_reduction: i32,
    /// Outer margins: left, top, right, bottom.
    pub margin: [i32; 4],
    /// Horizontal gap between tiles.
    pub spacing: i32,
    pub tile_padding_x: i32,
    pub tile_padding_y: i32,
    /// Gap between an icon and its label.
    pub label_gap: i32,
    /// Label line height relative to the font size.
    pub label_line_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            icon_size: 84,
            font_family: "JetBrains Mono".to_string(),
            font_size: 15.0,
            menu_bar_height: 42,
            height_reduction: 100,
            margin: [8, 4, 8, 4],
            spacing: 2,
            tile_padding_x: 11,
            tile_padding_y: 56,
            label_gap: 6,
            label_line_height: 1.4,
        }
    }
}

impl LayoutConfig {
    #[inline(always)]
    pub fn margin_left(&self) -> i32 {
        self.margin[0]
    }

    #[inline(always)]
    pub fn margin_top(&self) -> i32 {
        self.margin[1]
    }

    #[inline(always)]
    pub fn margin_right(&self) -> i32 {
        self.margin[2]
    }

    #[inline(always)]
    pub fn margin_bottom(&self) -> i32 {
        self.margin[3]
    }

    /// Height of a single label line, rounded up to whole pixels.
    pub fn label_height(&self) -> i32 {
        (self.font_size * self.label_line_height).ceil() as i32
    }
}

/// One row of the tile table as written in the TOML document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTile {
    pub key: String,
    pub name: String,
    /// Icon file name; defaults to `<name>.png`.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Launcher table before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    #[serde(default = "default_background")]
    pub background: PathBuf,
    #[serde(default)]
    pub tiles: Vec<RawTile>,
    #[serde(default)]
    pub commands: BTreeMap<String, Vec<String>>,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("icons")
}

fn default_background() -> PathBuf {
    PathBuf::from("Background2.png")
}

/// A validated tile: trigger key, label, icon file and command.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: char,
    pub name: String,
    pub icon: PathBuf,
    pub command: LaunchCommand,
}

/// Validated launcher configuration. Entries are in display order.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub layout: LayoutConfig,
    pub assets_dir: PathBuf,
    pub background: PathBuf,
    pub entries: Vec<Entry>,
}

impl LauncherConfig {
    /// Parse and validate a TOML launcher table.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        toml::from_str::<RawConfig>(source)?.validate()
    }

    pub fn entry(&self, key: char) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }
}

/// Fold a configured key to its single lower-case character.
fn parse_key(raw: &str) -> Result<char, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() && !c.is_control() => {
            // Lower-casing can expand to several chars; keep such keys as written.
            let mut lower = c.to_lowercase();
            Ok(match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            })
        }
        _ => Err(ConfigError::InvalidKey(raw.to_string())),
    }
}

impl RawConfig {
    /// Merge the tile and command tables into ordered entries.
    ///
    /// Both tables must cover exactly the same keys.
    pub fn validate(self) -> Result<LauncherConfig, ConfigError> {
        if self.tiles.is_empty() {
            return Err(ConfigError::NoTiles);
        }

        let tile_keys = self
            .tiles
            .iter()
            .map(|tile| parse_key(&tile.key))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(dup) = tile_keys.iter().duplicates().next() {
            return Err(ConfigError::DuplicateKey(*dup));
        }

        let mut commands = BTreeMap::new();
        for (raw_key, argv) in self.commands {
            let key = parse_key(&raw_key)?;
            if commands.insert(key, argv).is_some() {
                return Err(ConfigError::DuplicateKey(key));
            }
        }

        if let Some(orphan) = commands.keys().find(|key| !tile_keys.contains(*key)) {
            return Err(ConfigError::OrphanCommand(*orphan));
        }

        let mut entries = Vec::with_capacity(self.tiles.len());
        for (tile, key) in self.tiles.into_iter().zip(tile_keys) {
            let name = tile.name.trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::EmptyName(key));
            }
            let argv = commands.remove(&key).ok_or(ConfigError::MissingCommand(key))?;
            let command = LaunchCommand::from_argv(&argv).ok_or(ConfigError::EmptyCommand(key))?;
            let icon = tile
                .icon
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("{name}.png")));

            entries.push(Entry {
                key,
                name,
                icon,
                command,
            });
        }

        Ok(LauncherConfig {
            layout: self.layout,
            assets_dir: self.assets_dir,
            background: self.background,
            entries,
        })
    }
}
