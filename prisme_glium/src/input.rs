use super::*;

use glutin::event::VirtualKeyCode;

/// What a key press does to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Adjust(Adjustment),
    Close,
}

/// The key bindings: arrows for the ray fan, `W`/`S` for the sample's index,
/// `E`/`D` for the prism's, `Escape` to quit.
#[must_use]
pub fn key_action(key: VirtualKeyCode) -> Option<KeyAction> {
    use Adjustment::*;
    use VirtualKeyCode as K;

    let adjustment = match key {
        K::Up => MoreRays,
        K::Down => FewerRays,
        K::Right => WiderFan,
        K::Left => NarrowerFan,
        K::W => RaiseSampleIndex,
        K::S => LowerSampleIndex,
        K::E => RaisePrismIndex,
        K::D => LowerPrismIndex,
        K::Escape => return Some(KeyAction::Close),
        _ => return None,
    };

    Some(KeyAction::Adjust(adjustment))
}

/// Map a cursor position in the window to canvas coordinates.
///
/// The canvas is stretched over the whole window. Returns `None` for a degenerate
/// (minimized) window.
#[must_use]
pub fn cursor_to_canvas(
    position: dpi::PhysicalPosition<f64>,
    window_size: dpi::PhysicalSize<u32>,
    viewport: &Viewport,
) -> Option<Point> {
    let dpi::PhysicalSize { width, height } = window_size;

    if width == 0 || height == 0 {
        return None;
    }

    Some(Point::new(
        position.x * viewport.width / f64::from(width),
        position.y * viewport.height / f64::from(height),
    ))
}
