use crate::foundation::error::{RigError, RigResult};

/// Pixel placement of the face and mouth layers relative to the base layer.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Offset {
    /// Horizontal offset in pixels.
    pub x: i64,
    /// Vertical offset in pixels.
    pub y: i64,
}

impl Offset {
    /// Construct an offset.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Size of the composition surface, also emitted as the composite size literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> RigResult<Self> {
        if width == 0 || height == 0 {
            return Err(RigError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}
