//! Scroll geometry for the tab strip and the keep-alive viewports.
//!
//! Pure functions over the numbers the DOM reports, so the components only
//! read measurements and apply results.

use super::session::Session;
use contracts::shared::tabs::TabId;

/// Sub-pixel layouts can leave a 1px remainder at either end.
const EDGE_TOLERANCE: i32 = 1;

/// Which overflow arrows the strip should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overflow {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Left,
    Right,
}

pub fn overflow(scroll_left: i32, client_width: i32, scroll_width: i32) -> Overflow {
    if scroll_width <= client_width + EDGE_TOLERANCE {
        return Overflow::default();
    }
    Overflow {
        left: scroll_left > EDGE_TOLERANCE,
        right: scroll_left + client_width < scroll_width - EDGE_TOLERANCE,
    }
}

/// Minimal `scroll_left` that shows the whole item, or `None` if it already is.
///
/// An item wider than the viewport is aligned to its left edge.
pub fn reveal_offset(
    scroll_left: i32,
    client_width: i32,
    item_left: i32,
    item_width: i32,
) -> Option<i32> {
    let item_right = item_left + item_width;
    let view_right = scroll_left + client_width;
    if item_left < scroll_left || item_width > client_width {
        (item_left != scroll_left).then_some(item_left.max(0))
    } else if item_right > view_right {
        Some(item_right - client_width)
    } else {
        None
    }
}

/// Target `scroll_left` for one click on an overflow arrow.
pub fn step_offset(
    scroll_left: i32,
    client_width: i32,
    scroll_width: i32,
    step: i32,
    direction: StepDirection,
) -> i32 {
    let max = (scroll_width - client_width).max(0);
    let target = match direction {
        StepDirection::Left => scroll_left - step,
        StepDirection::Right => scroll_left + step,
    };
    target.clamp(0, max)
}

/// Offset to apply once layout has settled after `tab_id` became visible.
///
/// `None` when the tab was closed or deactivated in the meantime.
pub fn restore_target(session: &Session, tab_id: TabId) -> Option<i32> {
    if !session.is_active(tab_id) {
        return None;
    }
    session.get(tab_id).map(|tab| tab.scroll_position)
}
