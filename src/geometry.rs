//! Window sizing and placement.
//!
//! The popup is laid out as a single row of tiles. Its natural size is derived
//! from the layout metrics, then the height is reduced by a fixed amount and the
//! window is centered horizontally just below the menu bar.

use crate::config::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Final window rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Placement {
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Width of one tile: the icon plus its horizontal padding.
pub fn tile_width(layout: &LayoutConfig) -> i32 {
    layout.icon_size as i32 + 2 * layout.tile_padding_x
}

/// Height of one tile: padding, icon, gap and one label line.
pub fn tile_height(layout: &LayoutConfig) -> i32 {
    2 * layout.tile_padding_y + layout.icon_size as i32 + layout.label_gap + layout.label_height()
}

/// Size of the laid-out content before any reduction.
pub fn natural_size(layout: &LayoutConfig, tile_count: usize) -> Size {
    let n = tile_count as i32;
    let gaps = (n - 1).max(0);
    Size {
        width: layout.margin_left()
            + layout.margin_right()
            + n * tile_width(layout)
            + gaps * layout.spacing,
        height: layout.margin_top() + layout.margin_bottom() + tile_height(layout),
    }
}

/// Natural height minus the reduction, never below zero.
pub fn reduced_height(natural_height: i32, reduction: i32) -> i32 {
    (natural_height - reduction).max(0)
}

/// Horizontal center on the usable screen width and a fixed top offset.
///
/// Uses floor division, so a window wider than the screen gets a negative x.
pub fn origin(screen_width: i32, window_width: i32, menu_bar_height: i32) -> (i32, i32) {
    ((screen_width - window_width).div_euclid(2), menu_bar_height)
}

pub fn placement(layout: &LayoutConfig, tile_count: usize, screen_width: i32) -> Placement {
    let natural = natural_size(layout, tile_count);
    let width = natural.width;
    let height = reduced_height(natural.height, layout.height_reduction);
    let (x, y) = origin(screen_width, width, layout.menu_bar_height);
    Placement {
        x,
        y,
        width,
        height,
    }
}
