//! Two desktop windows with clickable regions
//!
//! Run with: `RUST_LOG=pane_core=debug cargo run -p pane_platform_desktop --example desktop_window`

use pane_core::prelude::*;
use pane_platform_desktop::DesktopBackend;
use std::time::Duration;

fn main() -> pane_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let backend = DesktopBackend::new().poll_timeout(Some(Duration::from_millis(16)));
    let mut ctx = Context::new(backend);

    for title in ["Pane - left", "Pane - right"] {
        let window = ctx.create_window(
            WindowConfig::new(title)
                .size(480.0, 320.0)
                .background(Color::rgb(0.1, 0.1, 0.12)),
        )?;

        let (mut tree, root) = RectTree::with_root(Size::new(480.0, 320.0));
        tree.add_child(root, Rect::new(20.0, 20.0, 200.0, 120.0));
        tree.add_child(root, Rect::new(260.0, 20.0, 200.0, 120.0));
        ctx.set_view_tree(window, Box::new(tree))?;

        ctx.callbacks(window)?
            .on_pointer_begin(|cx, action, x, y| {
                tracing::info!(window = ?cx.window(), ?action, x, y, "pointer down");
            })
            .on_key_down(|cx, key| match key {
                KeyCode::Escape => cx.close_window(),
                KeyCode::F11 => cx.set_visibility(Visibility::Fullscreen),
                KeyCode::Return => cx.set_visibility(Visibility::Visible),
                _ => {}
            })
            .on_codepoint(|cx, ch| {
                cx.set_title(format!("typed {ch:?}"));
            });
    }

    while ctx.poll_events() {}
    Ok(())
}
