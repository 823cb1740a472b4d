// Widget geometry - positions, sizes and the clamp rectangle
//
// Positions are window-manager offsets in integer pixels. Touch points are
// raw screen coordinates as delivered by the pointer source.
//
// The clamp rectangle lets the widget hang a quarter of its width off the
// leading edges and three quarters off the trailing edges. Both axes use
// the width-derived limits.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Widget offset in window-manager coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by a pointer delta
    pub fn offset(&self, delta: PointerDelta) -> Self {
        Self {
            x: self.x.saturating_add(delta.dx),
            y: self.y.saturating_add(delta.dy),
        }
    }
}

/// Raw pointer coordinates in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Displacement from `current` back to this point (`self - current`)
    ///
    /// Each component is truncated toward zero, so sub-pixel jitter never
    /// moves the widget.
    pub fn delta_to(&self, current: TouchPoint) -> PointerDelta {
        PointerDelta {
            dx: (self.x - current.x) as i32,
            dy: (self.y - current.y) as i32,
        }
    }
}

/// Integer pointer displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerDelta {
    pub dx: i32,
    pub dy: i32,
}

impl PointerDelta {
    /// Both components strictly inside `tolerance`
    pub fn within(&self, tolerance: f32) -> bool {
        (self.dx.unsigned_abs() as f32) < tolerance && (self.dy.unsigned_abs() as f32) < tolerance
    }
}

/// Display size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

/// Size of the draggable visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetExtent {
    pub width: i32,
    pub height: i32,
}

/// Clamp rectangle for one screen/widget pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetBounds {
    screen: ScreenSize,
    extent: WidgetExtent,
}

impl WidgetBounds {
    /// Build bounds after validating both sizes are non-negative
    pub fn new(screen: ScreenSize, extent: WidgetExtent) -> Result<Self, WidgetError> {
        if screen.width < 0 || screen.height < 0 {
            return Err(WidgetError::InvalidScreenSize {
                width: screen.width,
                height: screen.height,
            });
        }
        if extent.width < 0 || extent.height < 0 {
            return Err(WidgetError::InvalidExtent {
                width: extent.width,
                height: extent.height,
            });
        }
        Ok(Self { screen, extent })
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn extent(&self) -> WidgetExtent {
        self.extent
    }

    /// How far the widget may hang past the leading edges
    pub fn negative_limit(&self) -> i32 {
        self.extent.width / 4
    }

    /// How far the widget may hang past the trailing edges
    pub fn positive_limit(&self) -> i32 {
        // Widened so very large extents cannot overflow; the result fits in i32
        (i64::from(self.extent.width) * 3 / 4) as i32
    }

    /// Clamp a candidate position, axis by axis
    ///
    /// The lower bound wins when the screen is too small for the range to be
    /// non-empty.
    pub fn clamp(&self, candidate: Position) -> Position {
        Position {
            x: self.clamp_axis(candidate.x, self.screen.width),
            y: self.clamp_axis(candidate.y, self.screen.height),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.clamp(position) == position
    }

    fn clamp_axis(&self, value: i32, screen_extent: i32) -> i32 {
        let min = -self.negative_limit();
        let max = screen_extent - self.positive_limit();
        if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }
}
