//! The launcher popup.
//!
//! A single frameless, transparent window showing one tile per entry over a
//! stretched background image. Escape closes it; a tile's key closes it and
//! starts the tile's command.

use gpui::{
    App, Bounds, Context, DisplayId, FocusHandle, Focusable, KeyBinding, KeyDownEvent, Keystroke,
    ObjectFit, Pixels, Size, Window, WindowBackgroundAppearance, WindowBounds, WindowHandle,
    WindowKind, WindowOptions, actions, div, img, point, prelude::*, px, white,
};

use crate::assets::{Assets, Tile};
use crate::config::{LauncherConfig, LayoutConfig};
use crate::geometry::{self, Placement};
use crate::keys::{Dispatcher, KeyAction, KeyPress};

actions!(quick_launch, [Cancel]);

const KEY_CONTEXT: &str = "QuickLaunch";

/// Used when the platform reports no display.
const FALLBACK_SCREEN_WIDTH: i32 = 1920;

/// Register keybindings for the launcher.
pub fn register_keybindings(cx: &mut App) {
    cx.bind_keys([KeyBinding::new("escape", Cancel, Some(KEY_CONTEXT))]);
}

/// Strip a gpui keystroke down to what the dispatcher needs.
fn key_press(keystroke: &Keystroke) -> KeyPress<'_> {
    let modifiers = keystroke.modifiers;
    KeyPress::new(&keystroke.key, keystroke.key_char.as_deref())
        .with_modifiers(modifiers.control || modifiers.alt || modifiers.platform)
}

pub struct QuickLaunch {
    dispatcher: Dispatcher,
    assets: Assets,
    layout: LayoutConfig,
    focus_handle: FocusHandle,
}

impl QuickLaunch {
    pub fn new(config: LauncherConfig, assets: Assets, cx: &mut Context<Self>) -> Self {
        QuickLaunch {
            dispatcher: Dispatcher::new(config.entries),
            assets,
            layout: config.layout,
            focus_handle: cx.focus_handle(),
        }
    }

    fn cancel(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let KeyAction::Cancel = self.dispatcher.dispatch(KeyPress::escape()) {
            tracing::info!("Cancelled");
            window.remove_window();
            cx.quit();
        }
    }

    fn key_down(&mut self, event: &KeyDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let keystroke = &event.keystroke;

        // The Cancel binding only matches a bare Escape; modified Escapes land here.
        match self.dispatcher.dispatch(key_press(keystroke)) {
            KeyAction::Launch(entry) => {
                tracing::info!("Launching {}: {}", entry.name, entry.command);
                let command = entry.command.clone();
                window.remove_window();
                if let Err(err) = command.spawn_detached() {
                    tracing::error!("Failed to launch `{}`: {}", command, err);
                }
                cx.quit();
            }
            KeyAction::Cancel => {
                tracing::info!("Cancelled");
                window.remove_window();
                cx.quit();
            }
            KeyAction::Ignore => {
                tracing::debug!("Ignoring key {:?}", keystroke.key);
                cx.propagate();
            }
        }
    }

    fn render_tile(&self, tile: &Tile) -> impl IntoElement {
        let layout = &self.layout;
        let icon_size = px(layout.icon_size as f32);

        div()
            .flex()
            .flex_col()
            .flex_none()
            .items_center()
            .px(px(layout.tile_padding_x as f32))
            .py(px(layout.tile_padding_y as f32))
            .gap(px(layout.label_gap as f32))
            .child(
                img(tile.icon.clone())
                    .flex_none()
                    .w(icon_size)
                    .h(icon_size),
            )
            .child(
                div()
                    .h(px(layout.label_height() as f32))
                    .child(tile.label.clone()),
            )
    }
}

impl Focusable for QuickLaunch {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for QuickLaunch {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Keys only arrive while focused
        if !self.focus_handle.is_focused(window) {
            self.focus_handle.focus(window, cx);
        }

        let layout = &self.layout;

        div()
            .id("quick-launch")
            .track_focus(&self.focus_handle)
            .key_context(KEY_CONTEXT)
            .on_action(cx.listener(|this, _: &Cancel, window, cx| {
                this.cancel(window, cx);
            }))
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                this.key_down(event, window, cx);
            }))
            .relative()
            .size_full()
            .overflow_hidden()
            .font_family(layout.font_family.clone())
            .text_size(px(layout.font_size))
            .line_height(px(layout.label_height() as f32))
            .text_color(white())
            // Background, stretched to the window on every paint
            .child(
                img(self.assets.background.clone())
                    .absolute()
                    .top_0()
                    .left_0()
                    .size_full()
                    .object_fit(ObjectFit::Fill),
            )
            // Tile row
            .child(
                div()
                    .absolute()
                    .top_0()
                    .left_0()
                    .size_full()
                    .flex()
                    .flex_row()
                    .items_center()
                    .pl(px(layout.margin_left() as f32))
                    .pt(px(layout.margin_top() as f32))
                    .pr(px(layout.margin_right() as f32))
                    .pb(px(layout.margin_bottom() as f32))
                    .gap(px(layout.spacing as f32))
                    .children(self.assets.tiles.iter().map(|tile| self.render_tile(tile))),
            )
    }
}

#[cfg(all(target_os = "linux", feature = "wayland"))]
fn window_kind(placement: &Placement) -> WindowKind {
    use gpui::layer_shell::*;

    // Compositors center a surface anchored only to the top edge.
    WindowKind::LayerShell(LayerShellOptions {
        namespace: "quicklaunch".to_string(),
        layer: Layer::Overlay,
        anchor: Anchor::TOP,
        exclusive_zone: None,
        margin: Some((px(placement.y as f32), px(0.), px(0.), px(0.))),
        keyboard_interactivity: KeyboardInteractivity::Exclusive,
        ..Default::default()
    })
}

#[cfg(not(all(target_os = "linux", feature = "wayland")))]
fn window_kind(_placement: &Placement) -> WindowKind {
    WindowKind::PopUp
}

/// Layer surfaces treat a zero height as "stretch to the anchored edges",
/// which is invalid with a single anchor.
#[cfg(all(target_os = "linux", feature = "wayland"))]
fn surface_size(placement: &Placement) -> Size<Pixels> {
    Size::new(
        px(placement.width as f32),
        px(placement.height.max(1) as f32),
    )
}

#[cfg(not(all(target_os = "linux", feature = "wayland")))]
fn surface_size(placement: &Placement) -> Size<Pixels> {
    Size::new(px(placement.width as f32), px(placement.height as f32))
}

/// Returns the window options for a computed placement.
pub fn window_options(placement: Placement, display_id: Option<DisplayId>) -> WindowOptions {
    WindowOptions {
        display_id,
        titlebar: None,
        window_bounds: Some(WindowBounds::Windowed(Bounds {
            origin: point(px(placement.x as f32), px(placement.y as f32)),
            size: surface_size(&placement),
        })),
        app_id: Some("quicklaunch".to_string()),
        window_background: WindowBackgroundAppearance::Transparent,
        kind: window_kind(&placement),
        focus: true,
        ..Default::default()
    }
}

/// Open the launcher on the primary display.
pub fn open(
    config: LauncherConfig,
    assets: Assets,
    cx: &mut App,
) -> anyhow::Result<WindowHandle<QuickLaunch>> {
    let display = cx.primary_display();
    let screen_width = display
        .as_ref()
        .map(|display| f32::from(display.visible_bounds().size.width) as i32)
        .unwrap_or(FALLBACK_SCREEN_WIDTH);

    let placement = geometry::placement(&config.layout, assets.tiles.len(), screen_width);
    tracing::debug!(
        "Placing launcher at ({}, {}) size {:?} on screen width {}",
        placement.x,
        placement.y,
        placement.size(),
        screen_width
    );

    let options = window_options(placement, display.map(|display| display.id()));
    cx.open_window(options, move |_, cx| {
        cx.new(|cx| QuickLaunch::new(config, assets, cx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Entry;
    use crate::keys::LauncherState;
    use crate::launch::LaunchCommand;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(vec![Entry {
            key: 'm',
            name: "Messages".to_string(),
            icon: "Messages.png".into(),
            command: LaunchCommand::new("open", ["-a", "Messages"]),
        }])
    }

    #[test]
    fn test_modified_escape_cancels() {
        for source in ["shift-escape", "ctrl-escape", "alt-escape"] {
            let keystroke = Keystroke::parse(source).unwrap();
            let mut d = dispatcher();
            assert_eq!(d.dispatch(key_press(&keystroke)), KeyAction::Cancel, "{source}");
            assert_eq!(d.state(), LauncherState::Terminated);
        }
    }

    #[test]
    fn test_ctrl_letter_is_ignored() {
        let keystroke = Keystroke::parse("ctrl-m").unwrap();
        let mut d = dispatcher();
        assert_eq!(d.dispatch(key_press(&keystroke)), KeyAction::Ignore);
        assert_eq!(d.state(), LauncherState::Open);
    }

    fn placement(height: i32) -> Placement {
        Placement {
            x: 10,
            y: 42,
            width: 446,
            height,
        }
    }

    #[test]
    fn test_surface_size_keeps_reduced_height() {
        assert_eq!(surface_size(&placement(131)), Size::new(px(446.), px(131.)));
    }

    #[cfg(all(target_os = "linux", feature = "wayland"))]
    #[test]
    fn test_layer_surface_never_zero_height() {
        assert_eq!(surface_size(&placement(0)), Size::new(px(446.), px(1.)));
    }

    #[cfg(not(all(target_os = "linux", feature = "wayland")))]
    #[test]
    fn test_popup_keeps_zero_height() {
        assert_eq!(surface_size(&placement(0)), Size::new(px(446.), px(0.)));
    }
}
