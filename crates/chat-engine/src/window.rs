//! Floating-window placement.
//!
//! The chat windows float over the page and snap to the nearest screen edge
//! when released near one. The geometry is pure so it can be tested without
//! any UI; persistence goes to the shared scope so every tab agrees on
//! where a window lives.

use serde::{Deserialize, Serialize};
use storage::{keys, Store};

/// Inset kept between a window and the viewport border.
const INSET: f64 = 12.0;
/// Distance within which a release snaps to an edge.
const SNAP: f64 = 18.0;

/// Which edge a window is pinned to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
    Float,
}

/// A window position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPos {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub edge: Edge,
}

/// The window's own dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// The visible viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

fn clamp(n: f64, min: f64, max: f64) -> f64 {
    n.max(min).min(max)
}

/// Clamp a position into the viewport and pin it to the nearest edge when
/// within the snap threshold.
pub fn snap(pos: WindowPos, size: Size, viewport: Viewport) -> WindowPos {
    let max_x = (viewport.width - size.width - INSET).max(INSET);
    let max_y = (viewport.height - size.height - INSET).max(INSET);

    let x = clamp(pos.x, INSET, max_x);
    let y = clamp(pos.y, INSET, max_y);

    let near_left = x <= SNAP;
    let near_right = x >= viewport.width - size.width - SNAP;
    let near_top = y <= SNAP;
    let near_bottom = y >= viewport.height - size.height - SNAP;

    if near_left {
        WindowPos { x: INSET, y, edge: Edge::Left }
    } else if near_right {
        WindowPos { x: max_x, y, edge: Edge::Right }
    } else if near_top {
        WindowPos { x, y: INSET, edge: Edge::Top }
    } else if near_bottom {
        WindowPos { x, y: max_y, edge: Edge::Bottom }
    } else {
        WindowPos { x, y, edge: Edge::Float }
    }
}

/// Load a channel window's stored position.
pub fn load_window_pos(shared: &Store, channel: &str) -> Option<WindowPos> {
    shared.get_json(&keys::chat_win_pos(channel))
}

/// Persist a channel window's position.
pub fn save_window_pos(shared: &Store, channel: &str, pos: WindowPos) {
    shared.set_json(&keys::chat_win_pos(channel), &pos);
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };
    const SIZE: Size = Size {
        width: 360.0,
        height: 520.0,
    };

    #[test]
    fn positions_clamp_into_the_viewport() {
        let pos = snap(
            WindowPos { x: -500.0, y: 4000.0, edge: Edge::Float },
            SIZE,
            VIEWPORT,
        );
        assert_eq!(pos.x, INSET);
        assert_eq!(pos.y, VIEWPORT.height - SIZE.height - INSET);
    }

    #[test]
    fn release_near_an_edge_pins_to_it() {
        let pos = snap(
            WindowPos { x: 15.0, y: 300.0, edge: Edge::Float },
            SIZE,
            VIEWPORT,
        );
        assert_eq!(pos.edge, Edge::Left);
        assert_eq!(pos.x, INSET);

        let pos = snap(
            WindowPos { x: 910.0, y: 300.0, edge: Edge::Float },
            SIZE,
            VIEWPORT,
        );
        assert_eq!(pos.edge, Edge::Right);
        assert_eq!(pos.x, VIEWPORT.width - SIZE.width - INSET);
    }

    #[test]
    fn a_central_release_floats() {
        let pos = snap(
            WindowPos { x: 400.0, y: 200.0, edge: Edge::Left },
            SIZE,
            VIEWPORT,
        );
        assert_eq!(pos.edge, Edge::Float);
        assert_eq!(pos.x, 400.0);
        assert_eq!(pos.y, 200.0);
    }

    #[test]
    fn position_roundtrips_through_storage() {
        let shared = Store::memory();
        let pos = WindowPos { x: 40.0, y: 60.0, edge: Edge::Bottom };
        save_window_pos(&shared, "group", pos);
        assert_eq!(load_window_pos(&shared, "group"), Some(pos));
        assert_eq!(load_window_pos(&shared, "admins"), None);
    }
}
